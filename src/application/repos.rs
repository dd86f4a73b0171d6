//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::resource::Resource;
use crate::application::pagination::PageWindow;
use crate::domain::entities::{MenuRecord, RoleRecord};
use crate::domain::locale::Locale;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Storage for one resource type. Only live rows are visible: soft-deleted
/// rows never come back from any method.
#[async_trait]
pub trait ResourceRepo<R: Resource>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R::Record>, RepoError>;

    async fn find_by_unique(&self, key: &R::UniqueKey) -> Result<Option<R::Record>, RepoError>;

    /// Rows matching the window keyword, newest first, cut to the window.
    async fn list(&self, window: &PageWindow) -> Result<Vec<R::Record>, RepoError>;

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError>;

    /// Every live row, unordered.
    async fn list_all(&self) -> Result<Vec<R::Record>, RepoError>;

    /// The subset of `ids` that refer to live rows.
    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;

    async fn insert(&self, input: R::Create) -> Result<R::Record, RepoError>;

    /// Persist the mutable fields of `record` and refresh `updated_at`.
    /// Returns [`RepoError::NotFound`] when the row is no longer live.
    async fn update(&self, record: &R::Record) -> Result<R::Record, RepoError>;

    /// Returns `false` when no live row had this id.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait UserRolesRepo: Send + Sync {
    async fn list_user_roles(&self, user_id: Uuid) -> Result<Vec<RoleRecord>, RepoError>;

    async fn replace_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait RoleMenusRepo: Send + Sync {
    async fn list_role_menus(&self, role_id: Uuid) -> Result<Vec<MenuRecord>, RepoError>;

    async fn replace_role_menus(&self, role_id: Uuid, menu_ids: &[Uuid]) -> Result<(), RepoError>;
}

/// One translated string as the frontend consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub module: String,
    pub key: String,
    pub value: String,
}

#[async_trait]
pub trait TranslationBundleRepo: Send + Sync {
    async fn locale_entries(&self, locale: Locale) -> Result<Vec<BundleEntry>, RepoError>;
}
