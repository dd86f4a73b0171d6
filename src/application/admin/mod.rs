//! Application services for the administrative surface.

pub mod assignments;
pub mod bundles;
pub mod departments;
pub mod hierarchy;
pub mod menus;
pub mod modules;
pub mod resource;
pub mod roles;
#[cfg(test)]
pub(crate) mod testing;
pub mod translations;
pub mod users;

pub use assignments::AssignmentService;
pub use bundles::BundleService;
pub use resource::{Resource, ResourceError, ResourceService};
