//! User role and role menu assignment handlers

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::domain::entities::{MenuRecord, RoleRecord};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{RoleMenusRequest, UserRolesRequest};
use crate::infra::http::api::state::ApiState;

pub async fn list_user_roles(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoleRecord>>, ApiError> {
    let roles = state.assignments.roles_of_user(id).await?;
    Ok(Json(roles))
}

pub async fn replace_user_roles(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserRolesRequest>,
) -> Result<Json<Vec<RoleRecord>>, ApiError> {
    let roles = state
        .assignments
        .assign_user_roles(id, payload.role_ids)
        .await?;
    Ok(Json(roles))
}

pub async fn list_role_menus(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MenuRecord>>, ApiError> {
    let menus = state.assignments.menus_of_role(id).await?;
    Ok(Json(menus))
}

pub async fn replace_role_menus(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleMenusRequest>,
) -> Result<Json<Vec<MenuRecord>>, ApiError> {
    let menus = state
        .assignments
        .assign_role_menus(id, payload.menu_ids)
        .await?;
    Ok(Json(menus))
}
