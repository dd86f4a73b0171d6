//! Binding of each resource to its request bodies and service.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::admin::departments::DepartmentResource;
use crate::application::admin::menus::MenuResource;
use crate::application::admin::modules::ModuleResource;
use crate::application::admin::roles::RoleResource;
use crate::application::admin::translations::TranslationResource;
use crate::application::admin::users::UserResource;
use crate::application::admin::{Resource, ResourceService};
use crate::infra::http::api::models::*;
use crate::infra::http::api::state::ApiState;

/// A resource exposed through the generic CRUD endpoints.
pub trait HttpResource: Resource<Record: Serialize> + Sized {
    type CreateRequest: DeserializeOwned + Into<Self::Create> + Send + 'static;
    type UpdateRequest: DeserializeOwned + Into<Self::Patch> + Send + 'static;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>>;
}

impl HttpResource for ModuleResource {
    type CreateRequest = ModuleCreateRequest;
    type UpdateRequest = ModuleUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.modules
    }
}

impl HttpResource for TranslationResource {
    type CreateRequest = TranslationCreateRequest;
    type UpdateRequest = TranslationUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.translations
    }
}

impl HttpResource for UserResource {
    type CreateRequest = UserCreateRequest;
    type UpdateRequest = UserUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.users
    }
}

impl HttpResource for RoleResource {
    type CreateRequest = RoleCreateRequest;
    type UpdateRequest = RoleUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.roles
    }
}

impl HttpResource for DepartmentResource {
    type CreateRequest = DepartmentCreateRequest;
    type UpdateRequest = DepartmentUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.departments
    }
}

impl HttpResource for MenuResource {
    type CreateRequest = MenuCreateRequest;
    type UpdateRequest = MenuUpdateRequest;

    fn service(state: &ApiState) -> &Arc<ResourceService<Self>> {
        &state.menus
    }
}
