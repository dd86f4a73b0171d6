//! In-memory storage used by service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::application::admin::resource::Resource;
use crate::application::pagination::PageWindow;
use crate::application::repos::{RepoError, ResourceRepo};

/// Test-only hooks a resource provides so [`InMemoryRepo`] can store it.
pub(crate) trait Fixture: Resource {
    fn materialize(id: Uuid, input: Self::Create, now: OffsetDateTime) -> Self::Record;
    fn matches(record: &Self::Record, keyword: &str) -> bool;
    fn created_at(record: &Self::Record) -> OffsetDateTime;
    fn touch(record: &mut Self::Record, now: OffsetDateTime);
}

pub(crate) struct InMemoryRepo<R: Fixture> {
    rows: Mutex<Vec<R::Record>>,
    clock: Mutex<OffsetDateTime>,
    hide_unique_lookups: bool,
    count_calls: AtomicUsize,
}

impl<R: Fixture> Default for InMemoryRepo<R> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock: Mutex::new(OffsetDateTime::UNIX_EPOCH),
            hide_unique_lookups: false,
            count_calls: AtomicUsize::new(0),
        }
    }
}

impl<R: Fixture> InMemoryRepo<R> {
    /// Make `find_by_unique` miss so only the insert-time check can catch
    /// duplicates, as with two concurrent creates.
    pub(crate) fn hiding_unique_lookups(mut self) -> Self {
        self.hide_unique_lookups = true;
        self
    }

    pub(crate) fn with_rows(rows: Vec<R::Record>) -> Self {
        let repo = Self::default();
        *repo.rows.lock().unwrap() = rows;
        repo
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub(crate) fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    fn tick(&self) -> OffsetDateTime {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::seconds(1);
        *clock
    }
}

#[async_trait]
impl<R: Fixture> ResourceRepo<R> for InMemoryRepo<R> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<R::Record>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|row| R::id_of(row) == id).cloned())
    }

    async fn find_by_unique(&self, key: &R::UniqueKey) -> Result<Option<R::Record>, RepoError> {
        if self.hide_unique_lookups {
            return Ok(None);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|row| &R::unique_key_of(row) == key).cloned())
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<R::Record>, RepoError> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<R::Record> = rows
            .iter()
            .filter(|row| window.keyword().is_none_or(|keyword| R::matches(row, keyword)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            R::created_at(b)
                .cmp(&R::created_at(a))
                .then_with(|| R::id_of(b).cmp(&R::id_of(a)))
        });
        Ok(matching
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| keyword.is_none_or(|keyword| R::matches(row, keyword)))
            .count() as u64)
    }

    async fn list_all(&self) -> Result<Vec<R::Record>, RepoError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| rows.iter().any(|row| R::id_of(row) == *id))
            .collect())
    }

    async fn insert(&self, input: R::Create) -> Result<R::Record, RepoError> {
        let now = self.tick();
        let record = R::materialize(Uuid::new_v4(), input, now);
        let mut rows = self.rows.lock().unwrap();
        let key = R::unique_key_of(&record);
        if rows.iter().any(|row| R::unique_key_of(row) == key) {
            return Err(RepoError::Duplicate {
                constraint: format!("{}_unique", R::ENTITY),
            });
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &R::Record) -> Result<R::Record, RepoError> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        let id = R::id_of(record);
        let key = R::unique_key_of(record);
        if rows
            .iter()
            .any(|row| R::id_of(row) != id && R::unique_key_of(row) == key)
        {
            return Err(RepoError::Duplicate {
                constraint: format!("{}_unique", R::ENTITY),
            });
        }
        let slot = rows
            .iter_mut()
            .find(|row| R::id_of(row) == id)
            .ok_or(RepoError::NotFound)?;
        *slot = record.clone();
        R::touch(slot, now);
        Ok(slot.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| R::id_of(row) != id);
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !ids.contains(&R::id_of(row)));
        Ok((before - rows.len()) as u64)
    }
}
