//! Back-office administration service.
//!
//! Paginated management of users, roles, departments, menus and i18n
//! content over a Postgres store, plus an offline tool that restructures the
//! legacy per-language translation table.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
