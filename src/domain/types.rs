//! Shared domain enumerations aligned with persisted database enums.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "menu_kind", rename_all = "snake_case")]
pub enum MenuKind {
    Directory,
    Menu,
    Button,
}

impl MenuKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuKind::Directory => "directory",
            MenuKind::Menu => "menu",
            MenuKind::Button => "button",
        }
    }

    /// Buttons are permission leaves and never carry a route.
    pub fn allows_path(self) -> bool {
        !matches!(self, MenuKind::Button)
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "directory" => Ok(MenuKind::Directory),
            "menu" => Ok(MenuKind::Menu),
            "button" => Ok(MenuKind::Button),
            other => Err(DomainError::validation(format!(
                "unknown menu kind `{other}`"
            ))),
        }
    }
}
