//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod icons;
pub mod locale;
pub mod translations;
pub mod tree;
pub mod types;
