use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::admin::resource::ResourceError;
use crate::application::repos::TranslationBundleRepo;
use crate::domain::error::DomainError;
use crate::domain::locale::Locale;

/// `module -> key -> value` for one locale.
pub type LocaleBundle = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Clone)]
pub struct BundleService {
    repo: Arc<dyn TranslationBundleRepo>,
}

impl BundleService {
    pub fn new(repo: Arc<dyn TranslationBundleRepo>) -> Self {
        Self { repo }
    }

    pub async fn bundle(&self, tag: &str) -> Result<LocaleBundle, ResourceError> {
        let locale: Locale = tag
            .parse()
            .map_err(|err: DomainError| ResourceError::validation("locale", err.to_string()))?;

        let mut bundle = LocaleBundle::new();
        for entry in self.repo.locale_entries(locale).await? {
            bundle
                .entry(entry.module)
                .or_default()
                .insert(entry.key, entry.value);
        }
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::application::repos::{BundleEntry, RepoError};

    struct StubBundleRepo;

    #[async_trait]
    impl TranslationBundleRepo for StubBundleRepo {
        async fn locale_entries(&self, locale: Locale) -> Result<Vec<BundleEntry>, RepoError> {
            let save = match locale {
                Locale::ZhCn => "保存",
                Locale::EnUs => "Save",
                Locale::ArSa => "حفظ",
            };
            Ok(vec![
                BundleEntry {
                    module: "common".into(),
                    key: "save".into(),
                    value: save.into(),
                },
                BundleEntry {
                    module: "common".into(),
                    key: "cancel".into(),
                    value: String::new(),
                },
                BundleEntry {
                    module: "menu".into(),
                    key: "home".into(),
                    value: "Home".into(),
                },
            ])
        }
    }

    #[tokio::test]
    async fn bundle_groups_by_module() {
        let service = BundleService::new(Arc::new(StubBundleRepo));

        let bundle = service.bundle("en-US").await.unwrap();

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "common": {"cancel": "", "save": "Save"},
                "menu": {"home": "Home"}
            })
        );
    }

    #[tokio::test]
    async fn unknown_locale_is_a_validation_error() {
        let service = BundleService::new(Arc::new(StubBundleRepo));

        let err = service.bundle("fr-FR").await.unwrap_err();

        assert!(matches!(err, ResourceError::Validation { .. }));
    }
}
