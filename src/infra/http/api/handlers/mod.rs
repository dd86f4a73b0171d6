//! API handlers.
//!
//! The CRUD endpoints are written once against [`HttpResource`] and mounted
//! per resource; the remaining submodules cover the endpoints that only some
//! resources have.

mod assignments;
mod catalog;
mod resources;

pub use assignments::*;
pub use catalog::*;
pub use resources::HttpResource;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::pagination::{PageQuery, Paginated};
use crate::domain::tree::{Hierarchical, TreeNode};

use super::error::ApiError;
use super::models::{BatchDeleteRequest, BatchDeleteResponse};
use super::state::ApiState;

pub async fn list<R: HttpResource>(
    State(state): State<ApiState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<R::Record>>, ApiError> {
    let page = R::service(&state).list(&query).await?;
    Ok(Json(page))
}

pub async fn get<R: HttpResource>(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<R::Record>, ApiError> {
    match R::service(&state).get_by_id(id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::not_found(format!("{} `{id}` not found", R::ENTITY))),
    }
}

pub async fn create<R: HttpResource>(
    State(state): State<ApiState>,
    Json(payload): Json<R::CreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = R::service(&state).create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update<R: HttpResource>(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<R::UpdateRequest>,
) -> Result<Json<R::Record>, ApiError> {
    let record = R::service(&state).update(id, payload.into()).await?;
    Ok(Json(record))
}

pub async fn delete<R: HttpResource>(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    R::service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn batch_delete<R: HttpResource>(
    State(state): State<ApiState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, ApiError> {
    let deleted = R::service(&state).batch_delete(payload.ids).await?;
    Ok(Json(BatchDeleteResponse { deleted }))
}

pub async fn tree<R>(State(state): State<ApiState>) -> Result<Json<Vec<TreeNode<R::Record>>>, ApiError>
where
    R: HttpResource,
    R::Record: Hierarchical,
{
    let roots = R::service(&state).tree().await?;
    Ok(Json(roots))
}
