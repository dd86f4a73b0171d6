//! Read-only catalogs: the icon registry and per-locale translation bundles.

use axum::Json;
use axum::extract::{Path, State};

use crate::application::admin::bundles::LocaleBundle;
use crate::domain::icons::{ICONS, IconDescriptor};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_icons() -> Json<&'static [IconDescriptor]> {
    Json(ICONS)
}

pub async fn locale_bundle(
    State(state): State<ApiState>,
    Path(locale): Path<String>,
) -> Result<Json<LocaleBundle>, ApiError> {
    let bundle = state.bundles.bundle(&locale).await?;
    Ok(Json(bundle))
}
