//! Supported locales and their mapping onto translation columns.

use std::{fmt, str::FromStr};

use serde::Serialize;

use super::entities::TranslationRecord;
use super::error::DomainError;

/// A locale with a dedicated value column in the translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Locale {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "ar-SA")]
    ArSa,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::ZhCn, Locale::EnUs, Locale::ArSa];

    /// BCP 47 tag as stored in the legacy `language` column.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
            Locale::ArSa => "ar-SA",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh_cn",
            Locale::EnUs => "en_us",
            Locale::ArSa => "ar_sa",
        }
    }

    /// Exact-match lookup; unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.tag() == tag)
    }

    pub fn value_of(self, record: &TranslationRecord) -> &str {
        match self {
            Locale::ZhCn => &record.zh_cn,
            Locale::EnUs => &record.en_us,
            Locale::ArSa => &record.ar_sa,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_tag(value.trim())
            .ok_or_else(|| DomainError::validation(format!("unsupported locale `{value}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_resolve_to_locales() {
        assert_eq!(Locale::from_tag("zh-CN"), Some(Locale::ZhCn));
        assert_eq!(Locale::from_tag("en-US"), Some(Locale::EnUs));
        assert_eq!(Locale::from_tag("ar-SA"), Some(Locale::ArSa));
    }

    #[test]
    fn tag_lookup_is_exact() {
        assert_eq!(Locale::from_tag("en-us"), None);
        assert_eq!(Locale::from_tag("fr-FR"), None);
        assert!("de-DE".parse::<Locale>().is_err());
    }
}
