//! Icons a menu entry may reference.

use serde::Serialize;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

const fn icon(name: &'static str, label: &'static str, category: &'static str) -> IconDescriptor {
    IconDescriptor {
        name,
        label,
        category,
    }
}

/// Sorted by name; `find_icon` relies on it.
pub const ICONS: &[IconDescriptor] = &[
    icon("apartment", "Apartment", "organization"),
    icon("appstore", "App store", "navigation"),
    icon("audit", "Audit", "system"),
    icon("bars", "Bars", "navigation"),
    icon("book", "Book", "content"),
    icon("cluster", "Cluster", "organization"),
    icon("control", "Control", "system"),
    icon("dashboard", "Dashboard", "navigation"),
    icon("database", "Database", "system"),
    icon("file-text", "Document", "content"),
    icon("global", "Global", "i18n"),
    icon("home", "Home", "navigation"),
    icon("key", "Key", "security"),
    icon("lock", "Lock", "security"),
    icon("menu", "Menu", "navigation"),
    icon("safety", "Safety", "security"),
    icon("setting", "Setting", "system"),
    icon("team", "Team", "organization"),
    icon("tool", "Tool", "system"),
    icon("translation", "Translation", "i18n"),
    icon("user", "User", "organization"),
];

pub fn find_icon(name: &str) -> Option<&'static IconDescriptor> {
    ICONS
        .binary_search_by(|descriptor| descriptor.name.cmp(name))
        .ok()
        .map(|index| &ICONS[index])
}

/// Accepts registered icon names; the caller decides whether an icon is optional.
pub fn ensure_known_icon(name: &str) -> Result<(), DomainError> {
    match find_icon(name) {
        Some(_) => Ok(()),
        None => Err(DomainError::validation(format!("unknown icon `{name}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_and_unique() {
        assert!(ICONS.windows(2).all(|pair| pair[0].name < pair[1].name));
    }

    #[test]
    fn every_registered_icon_is_found() {
        for descriptor in ICONS {
            assert_eq!(find_icon(descriptor.name), Some(descriptor));
        }
    }

    #[test]
    fn unknown_icons_are_rejected() {
        assert!(find_icon("rocket").is_none());
        assert!(matches!(
            ensure_known_icon("Setting"),
            Err(DomainError::Validation { .. })
        ));
        assert!(ensure_known_icon("setting").is_ok());
    }
}
