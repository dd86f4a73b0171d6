//! Application services layer scaffolding.

pub mod admin;
pub mod error;
pub mod pagination;
pub mod repos;
pub mod translation_migration;
