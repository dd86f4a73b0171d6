//! Translation entries: one row per `(module, key)` with a value per locale.

use std::fmt;

use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code};
use crate::domain::entities::TranslationRecord;
use crate::domain::error::DomainError;

const MAX_VALUE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationKey {
    pub module: String,
    pub key: String,
}

impl TranslationKey {
    pub fn new(module: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateTranslation {
    pub module: String,
    pub key: String,
    pub zh_cn: String,
    pub en_us: String,
    pub ar_sa: String,
    pub remark: Option<String>,
}

/// `module` and `key` identify the entry and are ignored on update.
#[derive(Debug, Clone, Default)]
pub struct TranslationPatch {
    pub module: Option<String>,
    pub key: Option<String>,
    pub zh_cn: Option<String>,
    pub en_us: Option<String>,
    pub ar_sa: Option<String>,
    pub remark: Option<Option<String>>,
}

pub struct TranslationResource;

impl Resource for TranslationResource {
    const ENTITY: &'static str = "translation";
    const UNIQUE_FIELD: &'static str = "module/key";
    const DEFAULT_PAGE_SIZE: u32 = 50;

    type Record = TranslationRecord;
    type Create = CreateTranslation;
    type Patch = TranslationPatch;
    type UniqueKey = TranslationKey;

    fn id_of(record: &TranslationRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &TranslationRecord) -> TranslationKey {
        TranslationKey::new(record.module.clone(), record.key.clone())
    }

    fn unique_key_of_create(input: &CreateTranslation) -> TranslationKey {
        TranslationKey::new(input.module.clone(), input.key.clone())
    }

    fn normalize_create(input: CreateTranslation) -> Result<CreateTranslation, DomainError> {
        Ok(CreateTranslation {
            module: require_code(&input.module, "module")?,
            key: require_code(&input.key, "key")?,
            zh_cn: locale_value(input.zh_cn, "zhCN")?,
            en_us: locale_value(input.en_us, "enUS")?,
            ar_sa: locale_value(input.ar_sa, "arSA")?,
            remark: optional_text(input.remark, "remark", 512)?,
        })
    }

    fn merge(
        mut existing: TranslationRecord,
        patch: TranslationPatch,
    ) -> Result<TranslationRecord, DomainError> {
        if let Some(value) = patch.zh_cn {
            existing.zh_cn = locale_value(value, "zhCN")?;
        }
        if let Some(value) = patch.en_us {
            existing.en_us = locale_value(value, "enUS")?;
        }
        if let Some(value) = patch.ar_sa {
            existing.ar_sa = locale_value(value, "arSA")?;
        }
        if let Some(remark) = patch.remark {
            existing.remark = optional_text(remark, "remark", 512)?;
        }
        Ok(existing)
    }
}

/// Values keep inner whitespace; only the ends are trimmed.
fn locale_value(value: String, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_VALUE_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_VALUE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod fixture {
    use time::OffsetDateTime;

    use super::*;
    use crate::application::admin::testing::Fixture;

    impl Fixture for TranslationResource {
        fn materialize(
            id: Uuid,
            input: CreateTranslation,
            now: OffsetDateTime,
        ) -> TranslationRecord {
            TranslationRecord {
                id,
                module: input.module,
                key: input.key,
                zh_cn: input.zh_cn,
                en_us: input.en_us,
                ar_sa: input.ar_sa,
                remark: input.remark,
                created_at: now,
                updated_at: now,
            }
        }

        fn matches(record: &TranslationRecord, keyword: &str) -> bool {
            [
                &record.module,
                &record.key,
                &record.zh_cn,
                &record.en_us,
                &record.ar_sa,
            ]
            .iter()
            .any(|field| field.contains(keyword))
        }

        fn created_at(record: &TranslationRecord) -> OffsetDateTime {
            record.created_at
        }

        fn touch(record: &mut TranslationRecord, now: OffsetDateTime) {
            record.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::admin::resource::{ResourceError, ResourceService};
    use crate::application::admin::testing::InMemoryRepo;
    use crate::application::pagination::PageQuery;
    use crate::application::repos::ResourceRepo;

    fn service() -> ResourceService<TranslationResource> {
        let repo: Arc<dyn ResourceRepo<TranslationResource>> =
            Arc::new(InMemoryRepo::<TranslationResource>::default());
        ResourceService::new(repo)
    }

    fn entry(module: &str, key: &str, en: &str) -> CreateTranslation {
        CreateTranslation {
            module: module.into(),
            key: key.into(),
            en_us: en.into(),
            ..CreateTranslation::default()
        }
    }

    #[tokio::test]
    async fn same_key_in_other_module_is_allowed() {
        let service = service();
        service.create(entry("common", "save", "Save")).await.unwrap();

        service.create(entry("user", "save", "Save user")).await.unwrap();
        let err = service
            .create(entry("common", "save", "Again"))
            .await
            .unwrap_err();

        match err {
            ResourceError::Conflict { value, .. } => assert_eq!(value, "common/save"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_locales_default_to_empty_strings() {
        let service = service();
        let created = service.create(entry("x", "y", "")).await.unwrap();

        assert_eq!(created.zh_cn, "");
        assert_eq!(created.en_us, "");
        assert_eq!(created.ar_sa, "");
    }

    #[tokio::test]
    async fn update_changes_values_but_not_identity() {
        let service = service();
        let created = service.create(entry("common", "save", "Save")).await.unwrap();

        let updated = service
            .update(
                created.id,
                TranslationPatch {
                    module: Some("other".into()),
                    key: Some("renamed".into()),
                    zh_cn: Some("保存".into()),
                    ..TranslationPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.module, "common");
        assert_eq!(updated.key, "save");
        assert_eq!(updated.zh_cn, "保存");
        assert_eq!(updated.en_us, "Save");
    }

    #[tokio::test]
    async fn default_page_holds_fifty_entries() {
        let service = service();
        for index in 0..60 {
            service
                .create(entry("bulk", &format!("k{index}"), "v"))
                .await
                .unwrap();
        }

        let page = service.list(&PageQuery::default()).await.unwrap();

        assert_eq!(page.list.len(), 50);
        assert_eq!(page.pagination.total, 60);
    }
}
