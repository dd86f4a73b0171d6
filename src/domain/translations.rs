//! Folding of per-language translation rows into one row per key.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use super::locale::Locale;

/// A row of the narrow table: one value for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyTranslationRow {
    /// Legacy primary key as text; older tables use serial or uuid ids.
    pub id: String,
    pub language: String,
    pub module: String,
    pub key: String,
    pub value: String,
    pub remark: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A row of the wide table before it receives an id.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTranslation {
    pub module: String,
    pub key: String,
    pub zh_cn: String,
    pub en_us: String,
    pub ar_sa: String,
    pub remark: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl MergedTranslation {
    fn empty(module: String, key: String, created_at: OffsetDateTime) -> Self {
        Self {
            module,
            key,
            zh_cn: String::new(),
            en_us: String::new(),
            ar_sa: String::new(),
            remark: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn slot_mut(&mut self, locale: Locale) -> &mut String {
        match locale {
            Locale::ZhCn => &mut self.zh_cn,
            Locale::EnUs => &mut self.en_us,
            Locale::ArSa => &mut self.ar_sa,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    /// Sorted by `(module, key)`.
    pub rows: Vec<MergedTranslation>,
    /// Rows whose language tag matched no locale column.
    pub dropped: usize,
}

/// Group legacy rows by `(module, key)`.
///
/// Rows are processed in `(module, key, language)` order whatever the input
/// order. Every group yields one row even when none of its languages is
/// recognised; missing locales stay empty. When a language repeats inside a
/// group, the later row's value is kept. The first non-blank remark wins.
/// `created_at` is the earliest of the group and `updated_at` the latest.
pub fn merge_legacy_rows(mut rows: Vec<LegacyTranslationRow>) -> MergeOutcome {
    rows.sort_by(|a, b| {
        (&a.module, &a.key, &a.language).cmp(&(&b.module, &b.key, &b.language))
    });

    let mut groups: BTreeMap<(String, String), MergedTranslation> = BTreeMap::new();
    let mut dropped = 0;

    for row in rows {
        let LegacyTranslationRow {
            language,
            module,
            key,
            value,
            remark,
            created_at,
            updated_at,
            ..
        } = row;

        let merged = groups
            .entry((module.clone(), key.clone()))
            .or_insert_with(|| MergedTranslation::empty(module, key, created_at));

        merged.created_at = merged.created_at.min(created_at);
        merged.updated_at = merged.updated_at.max(updated_at);

        if merged.remark.is_none() {
            merged.remark = remark.filter(|text| !text.trim().is_empty());
        }

        match Locale::from_tag(&language) {
            Some(locale) => *merged.slot_mut(locale) = value,
            None => dropped += 1,
        }
    }

    MergeOutcome {
        rows: groups.into_values().collect(),
        dropped,
    }
}
