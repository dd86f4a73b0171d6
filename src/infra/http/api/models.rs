use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::admin::departments::{CreateDepartment, DepartmentPatch};
use crate::application::admin::menus::{CreateMenu, MenuPatch};
use crate::application::admin::modules::{CreateModule, ModulePatch};
use crate::application::admin::roles::{CreateRole, RolePatch};
use crate::application::admin::translations::{CreateTranslation, TranslationPatch};
use crate::application::admin::users::{CreateUser, UserPatch};
use crate::domain::types::{MenuKind, UserStatus};

/// Distinguish an explicit `null` (clear the field) from an absent key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCreateRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub remark: Option<String>,
}

impl From<ModuleCreateRequest> for CreateModule {
    fn from(request: ModuleCreateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remark: Option<Option<String>>,
}

impl From<ModuleUpdateRequest> for ModulePatch {
    fn from(request: ModuleUpdateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TranslationCreateRequest {
    pub module: String,
    pub key: String,
    #[serde(rename = "zhCN", default)]
    pub zh_cn: String,
    #[serde(rename = "enUS", default)]
    pub en_us: String,
    #[serde(rename = "arSA", default)]
    pub ar_sa: String,
    pub remark: Option<String>,
}

impl From<TranslationCreateRequest> for CreateTranslation {
    fn from(request: TranslationCreateRequest) -> Self {
        Self {
            module: request.module,
            key: request.key,
            zh_cn: request.zh_cn,
            en_us: request.en_us,
            ar_sa: request.ar_sa,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TranslationUpdateRequest {
    pub module: Option<String>,
    pub key: Option<String>,
    #[serde(rename = "zhCN")]
    pub zh_cn: Option<String>,
    #[serde(rename = "enUS")]
    pub en_us: Option<String>,
    #[serde(rename = "arSA")]
    pub ar_sa: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remark: Option<Option<String>>,
}

impl From<TranslationUpdateRequest> for TranslationPatch {
    fn from(request: TranslationUpdateRequest) -> Self {
        Self {
            module: request.module,
            key: request.key,
            zh_cn: request.zh_cn,
            en_us: request.en_us,
            ar_sa: request.ar_sa,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    pub username: String,
    pub nickname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<Uuid>,
    #[serde(default)]
    pub status: UserStatus,
    pub remark: Option<String>,
}

impl From<UserCreateRequest> for CreateUser {
    fn from(request: UserCreateRequest) -> Self {
        Self {
            username: request.username,
            nickname: request.nickname,
            email: request.email,
            phone: request.phone,
            department_id: request.department_id,
            status: request.status,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub username: Option<String>,
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub department_id: Option<Option<Uuid>>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remark: Option<Option<String>>,
}

impl From<UserUpdateRequest> for UserPatch {
    fn from(request: UserUpdateRequest) -> Self {
        Self {
            username: request.username,
            nickname: request.nickname,
            email: request.email,
            phone: request.phone,
            department_id: request.department_id,
            status: request.status,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreateRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<RoleCreateRequest> for CreateRole {
    fn from(request: RoleCreateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            enabled: request.enabled,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub enabled: Option<bool>,
}

impl From<RoleUpdateRequest> for RolePatch {
    fn from(request: RoleUpdateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            description: request.description,
            enabled: request.enabled,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCreateRequest {
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
    pub leader: Option<String>,
    pub remark: Option<String>,
}

impl From<DepartmentCreateRequest> for CreateDepartment {
    fn from(request: DepartmentCreateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            parent_id: request.parent_id,
            sort_order: request.sort_order,
            leader: request.leader,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<Uuid>>,
    pub sort_order: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub leader: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remark: Option<Option<String>>,
}

impl From<DepartmentUpdateRequest> for DepartmentPatch {
    fn from(request: DepartmentUpdateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            parent_id: request.parent_id,
            sort_order: request.sort_order,
            leader: request.leader,
            remark: request.remark,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCreateRequest {
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub kind: MenuKind,
    pub path: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl From<MenuCreateRequest> for CreateMenu {
    fn from(request: MenuCreateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            parent_id: request.parent_id,
            kind: request.kind,
            path: request.path,
            icon: request.icon,
            sort_order: request.sort_order,
            visible: request.visible,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuUpdateRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<Uuid>>,
    pub kind: Option<MenuKind>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub path: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub icon: Option<Option<String>>,
    pub sort_order: Option<i32>,
    pub visible: Option<bool>,
}

impl From<MenuUpdateRequest> for MenuPatch {
    fn from(request: MenuUpdateRequest) -> Self {
        Self {
            code: request.code,
            name: request.name,
            parent_id: request.parent_id,
            kind: request.kind,
            path: request.path,
            icon: request.icon,
            sort_order: request.sort_order,
            visible: request.visible,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BatchDeleteResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesRequest {
    pub role_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMenusRequest {
    pub menu_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_null_clears_and_absent_keeps() {
        let cleared: UserUpdateRequest =
            serde_json::from_str(r#"{"email": null, "nickname": "Ada"}"#).expect("parse");
        assert_eq!(cleared.email, Some(None));
        assert_eq!(cleared.phone, None);
        assert_eq!(cleared.nickname.as_deref(), Some("Ada"));

        let set: UserUpdateRequest =
            serde_json::from_str(r#"{"email": "ada@example.com"}"#).expect("parse");
        assert_eq!(set.email, Some(Some("ada@example.com".to_string())));
    }

    #[test]
    fn create_defaults_fill_optional_flags() {
        let role: RoleCreateRequest =
            serde_json::from_str(r#"{"code": "ops", "name": "Operators"}"#).expect("parse");
        assert!(role.enabled);

        let menu: MenuCreateRequest =
            serde_json::from_str(r#"{"code": "sys", "name": "System", "kind": "directory"}"#)
                .expect("parse");
        assert!(menu.visible);
        assert_eq!(menu.sort_order, 0);
    }

    #[test]
    fn translation_columns_use_locale_names() {
        let request: TranslationCreateRequest = serde_json::from_str(
            r#"{"module": "common", "key": "save", "zhCN": "保存", "enUS": "Save"}"#,
        )
        .expect("parse");
        assert_eq!(request.zh_cn, "保存");
        assert_eq!(request.en_us, "Save");
        assert_eq!(request.ar_sa, "");
    }
}
