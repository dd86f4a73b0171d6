//! Paginated CRUD implemented once for every administrable resource.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::pagination::{MAX_PAGE_SIZE, PageQuery, Paginated};
use crate::application::repos::{RepoError, ResourceRepo};
use crate::domain::error::DomainError;

pub const METRIC_RESOURCE_MUTATIONS: &str = "backoffice_resource_mutations_total";

/// Describes one entity type handled by [`ResourceService`].
pub trait Resource: Send + Sync + 'static {
    /// Name used in errors and logs.
    const ENTITY: &'static str;
    /// Name of the field (or field pair) that must be unique across live rows.
    const UNIQUE_FIELD: &'static str;
    const DEFAULT_PAGE_SIZE: u32;

    type Record: Clone + fmt::Debug + Send + Sync + 'static;
    type Create: fmt::Debug + Send + Sync + 'static;
    type Patch: fmt::Debug + Send + Sync + 'static;
    type UniqueKey: Clone + PartialEq + fmt::Display + fmt::Debug + Send + Sync + 'static;

    fn id_of(record: &Self::Record) -> Uuid;

    fn unique_key_of(record: &Self::Record) -> Self::UniqueKey;

    fn unique_key_of_create(input: &Self::Create) -> Self::UniqueKey;

    /// Trim and validate a create input.
    fn normalize_create(input: Self::Create) -> Result<Self::Create, DomainError>;

    /// Apply the fields present in `patch` to `existing` and validate the
    /// result. Fields that may not change after creation are ignored.
    fn merge(existing: Self::Record, patch: Self::Patch) -> Result<Self::Record, DomainError>;
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid {entity}: {message}")]
    Validation {
        entity: &'static str,
        message: String,
    },
    #[error("{entity} with {field} `{value}` already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ResourceError {
    pub fn validation(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            entity,
            message: message.into(),
        }
    }

    fn from_domain(entity: &'static str, error: DomainError) -> Self {
        match error {
            DomainError::Validation { message } | DomainError::Invariant { message } => {
                Self::Validation { entity, message }
            }
            DomainError::NotFound { entity: missing } => Self::Validation {
                entity,
                message: format!("referenced {missing} does not exist"),
            },
        }
    }
}

pub struct ResourceService<R: Resource> {
    repo: Arc<dyn ResourceRepo<R>>,
    max_page_size: u32,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            max_page_size: self.max_page_size,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(repo: Arc<dyn ResourceRepo<R>>) -> Self {
        Self {
            repo,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    pub fn repo(&self) -> &Arc<dyn ResourceRepo<R>> {
        &self.repo
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Paginated<R::Record>, ResourceError> {
        let window = query
            .resolve(R::DEFAULT_PAGE_SIZE, self.max_page_size)
            .map_err(|err| ResourceError::validation(R::ENTITY, err.to_string()))?;

        let total = self.repo.count(window.keyword()).await?;
        if window.offset() >= total {
            return Ok(Paginated::empty(&window, total));
        }

        let list = self.repo.list(&window).await?;
        Ok(Paginated::new(list, &window, total))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<R::Record>, ResourceError> {
        self.repo.find_by_id(id).await.map_err(ResourceError::from)
    }

    pub async fn get_by_unique(
        &self,
        key: &R::UniqueKey,
    ) -> Result<Option<R::Record>, ResourceError> {
        self.repo
            .find_by_unique(key)
            .await
            .map_err(ResourceError::from)
    }

    /// Like [`Self::get_by_id`] but a miss is an error.
    pub async fn require(&self, id: Uuid) -> Result<R::Record, ResourceError> {
        self.get_by_id(id).await?.ok_or(ResourceError::NotFound {
            entity: R::ENTITY,
            id,
        })
    }

    pub async fn create(&self, input: R::Create) -> Result<R::Record, ResourceError> {
        let input =
            R::normalize_create(input).map_err(|err| ResourceError::from_domain(R::ENTITY, err))?;
        let key = R::unique_key_of_create(&input);

        if self.repo.find_by_unique(&key).await?.is_some() {
            return Err(conflict::<R>(&key));
        }

        let record = self.repo.insert(input).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => conflict::<R>(&key),
            other => ResourceError::Repo(other),
        })?;

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => R::ENTITY, "op" => "create").increment(1);
        info!(
            target = "application::admin::resource",
            entity = R::ENTITY,
            id = %R::id_of(&record),
            key = %key,
            "created"
        );
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, patch: R::Patch) -> Result<R::Record, ResourceError> {
        let existing = self.require(id).await?;
        let previous_key = R::unique_key_of(&existing);

        let merged =
            R::merge(existing, patch).map_err(|err| ResourceError::from_domain(R::ENTITY, err))?;
        let key = R::unique_key_of(&merged);

        if key != previous_key {
            if let Some(holder) = self.repo.find_by_unique(&key).await? {
                if R::id_of(&holder) != id {
                    return Err(conflict::<R>(&key));
                }
            }
        }

        let record = self.repo.update(&merged).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => conflict::<R>(&key),
            RepoError::NotFound => ResourceError::NotFound {
                entity: R::ENTITY,
                id,
            },
            other => ResourceError::Repo(other),
        })?;

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => R::ENTITY, "op" => "update").increment(1);
        info!(
            target = "application::admin::resource",
            entity = R::ENTITY,
            id = %id,
            "updated"
        );
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ResourceError> {
        if !self.repo.delete(id).await? {
            return Err(ResourceError::NotFound {
                entity: R::ENTITY,
                id,
            });
        }

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => R::ENTITY, "op" => "delete").increment(1);
        info!(
            target = "application::admin::resource",
            entity = R::ENTITY,
            id = %id,
            "deleted"
        );
        Ok(())
    }

    /// Delete every live row among `ids`; unknown ids are skipped.
    pub async fn batch_delete(&self, ids: Vec<Uuid>) -> Result<u64, ResourceError> {
        if ids.is_empty() {
            return Err(ResourceError::validation(R::ENTITY, "ids must not be empty"));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<Uuid> = ids.into_iter().filter(|id| seen.insert(*id)).collect();

        let deleted = self.repo.delete_many(&unique).await?;

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => R::ENTITY, "op" => "delete")
            .increment(deleted);
        info!(
            target = "application::admin::resource",
            entity = R::ENTITY,
            requested = unique.len(),
            deleted,
            "batch deleted"
        );
        Ok(deleted)
    }
}

fn conflict<R: Resource>(key: &R::UniqueKey) -> ResourceError {
    ResourceError::Conflict {
        entity: R::ENTITY,
        field: R::UNIQUE_FIELD,
        value: key.to_string(),
    }
}

/// Trimmed value of a mandatory text field.
pub(crate) fn require_text(
    value: &str,
    field: &'static str,
    max_len: usize,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    ensure_max_len(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional text field; blank means absent.
pub(crate) fn optional_text(
    value: Option<String>,
    field: &'static str,
    max_len: usize,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(value) if !value.trim().is_empty() => {
            let trimmed = value.trim();
            ensure_max_len(trimmed, field, max_len)?;
            Ok(Some(trimmed.to_string()))
        }
        _ => Ok(None),
    }
}

/// Codes are identifiers: ASCII letters, digits, `_`, `-`, `.` and `:`.
pub(crate) fn require_code(value: &str, field: &'static str) -> Result<String, DomainError> {
    let code = require_text(value, field, 64)?;
    let valid = code
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':'));
    if !valid {
        return Err(DomainError::validation(format!(
            "{field} may only contain ASCII letters, digits, `_`, `-`, `.` and `:`"
        )));
    }
    Ok(code)
}

fn ensure_max_len(value: &str, field: &'static str, max_len: usize) -> Result<(), DomainError> {
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
