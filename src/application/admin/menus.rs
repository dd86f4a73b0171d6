//! Menu entries: directories, routed pages and permission buttons.

use uuid::Uuid;

use crate::application::admin::resource::{Resource, optional_text, require_code, require_text};
use crate::domain::entities::MenuRecord;
use crate::domain::error::DomainError;
use crate::domain::icons::ensure_known_icon;
use crate::domain::types::MenuKind;

#[derive(Debug, Clone)]
pub struct CreateMenu {
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub kind: MenuKind,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MenuPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
    pub kind: Option<MenuKind>,
    pub path: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub visible: Option<bool>,
}

pub struct MenuResource;

impl Resource for MenuResource {
    const ENTITY: &'static str = "menu";
    const UNIQUE_FIELD: &'static str = "code";
    const DEFAULT_PAGE_SIZE: u32 = 10;

    type Record = MenuRecord;
    type Create = CreateMenu;
    type Patch = MenuPatch;
    type UniqueKey = String;

    fn id_of(record: &MenuRecord) -> Uuid {
        record.id
    }

    fn unique_key_of(record: &MenuRecord) -> String {
        record.code.clone()
    }

    fn unique_key_of_create(input: &CreateMenu) -> String {
        input.code.clone()
    }

    fn normalize_create(input: CreateMenu) -> Result<CreateMenu, DomainError> {
        let path = optional_text(input.path, "path", 255)?;
        let icon = icon(input.icon)?;
        ensure_route(input.kind, path.as_deref())?;

        Ok(CreateMenu {
            code: require_code(&input.code, "code")?,
            name: require_text(&input.name, "name", 64)?,
            parent_id: input.parent_id,
            kind: input.kind,
            path,
            icon,
            sort_order: input.sort_order,
            visible: input.visible,
        })
    }

    fn merge(mut existing: MenuRecord, patch: MenuPatch) -> Result<MenuRecord, DomainError> {
        if let Some(code) = patch.code {
            existing.code = require_code(&code, "code")?;
        }
        if let Some(name) = patch.name {
            existing.name = require_text(&name, "name", 64)?;
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == Some(existing.id) {
                return Err(DomainError::validation("a menu cannot be its own parent"));
            }
            existing.parent_id = parent_id;
        }
        if let Some(kind) = patch.kind {
            existing.kind = kind;
        }
        if let Some(path) = patch.path {
            existing.path = optional_text(path, "path", 255)?;
        }
        if let Some(value) = patch.icon {
            existing.icon = icon(value)?;
        }
        if let Some(sort_order) = patch.sort_order {
            existing.sort_order = sort_order;
        }
        if let Some(visible) = patch.visible {
            existing.visible = visible;
        }
        ensure_route(existing.kind, existing.path.as_deref())?;
        Ok(existing)
    }
}

fn icon(value: Option<String>) -> Result<Option<String>, DomainError> {
    let icon = optional_text(value, "icon", 64)?;
    if let Some(name) = &icon {
        ensure_known_icon(name)?;
    }
    Ok(icon)
}

fn ensure_route(kind: MenuKind, path: Option<&str>) -> Result<(), DomainError> {
    match path {
        Some(_) if !kind.allows_path() => Err(DomainError::validation(format!(
            "a {kind} entry cannot have a path"
        ))),
        None if kind == MenuKind::Menu => {
            Err(DomainError::validation("a menu entry needs a path"))
        }
        _ => Ok(()),
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::admin::resource::{ResourceError, ResourceService};
    use crate::application::admin::testing::InMemoryRepo;
    use crate::application::repos::ResourceRepo;

    fn service() -> ResourceService<MenuResource> {
        let repo: Arc<dyn ResourceRepo<MenuResource>> =
            Arc::new(InMemoryRepo::<MenuResource>::default());
        ResourceService::new(repo)
    }

    fn page(code: &str, path: &str) -> CreateMenu {
        CreateMenu {
            code: code.into(),
            name: code.into(),
            parent_id: None,
            kind: MenuKind::Menu,
            path: Some(path.into()),
            icon: Some("setting".into()),
            sort_order: 0,
            visible: true,
        }
    }

    #[tokio::test]
    async fn unknown_icon_is_rejected() {
        let err = service()
            .create(CreateMenu {
                icon: Some("rocket".into()),
                ..page("system", "/system")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::Validation { .. }));
    }

    #[tokio::test]
    async fn buttons_cannot_carry_paths() {
        let err = service()
            .create(CreateMenu {
                kind: MenuKind::Button,
                ..page("user.delete", "/users/delete")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ResourceError::Validation { .. }));
    }

    #[tokio::test]
    async fn switching_to_button_requires_dropping_the_path() {
        let service = service();
        let created = service.create(page("users", "/users")).await.unwrap();

        let rejected = service
            .update(
                created.id,
                MenuPatch {
                    kind: Some(MenuKind::Button),
                    ..MenuPatch::default()
                },
            )
            .await;
        assert!(matches!(rejected, Err(ResourceError::Validation { .. })));

        let updated = service
            .update(
                created.id,
                MenuPatch {
                    kind: Some(MenuKind::Button),
                    path: Some(None),
                    ..MenuPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.kind, MenuKind::Button);
        assert_eq!(updated.path, None);
    }

    #[tokio::test]
    async fn clearing_the_icon_is_allowed() {
        let service = service();
        let created = service.create(page("users", "/users")).await.unwrap();

        let updated = service
            .update(
                created.id,
                MenuPatch {
                    icon: Some(None),
                    ..MenuPatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.icon, None);
    }
}
