pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::admin::departments::DepartmentResource;
use crate::application::admin::menus::MenuResource;
use crate::application::admin::modules::ModuleResource;
use crate::application::admin::roles::RoleResource;
use crate::application::admin::translations::TranslationResource;
use crate::application::admin::users::UserResource;

use handlers::HttpResource;

/// CRUD routes for one resource, relative to its mount point.
fn resource_routes<R: HttpResource>() -> Router<ApiState> {
    Router::new()
        .route("/", get(handlers::list::<R>).post(handlers::create::<R>))
        .route("/batch-delete", post(handlers::batch_delete::<R>))
        .route(
            "/{id}",
            get(handlers::get::<R>)
                .patch(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
}

pub fn build_api_router() -> Router<ApiState> {
    let users = resource_routes::<UserResource>().route(
        "/{id}/roles",
        get(handlers::list_user_roles).put(handlers::replace_user_roles),
    );
    let roles = resource_routes::<RoleResource>().route(
        "/{id}/menus",
        get(handlers::list_role_menus).put(handlers::replace_role_menus),
    );
    let departments = resource_routes::<DepartmentResource>()
        .route("/tree", get(handlers::tree::<DepartmentResource>));
    let menus =
        resource_routes::<MenuResource>().route("/tree", get(handlers::tree::<MenuResource>));

    Router::new()
        .nest("/api/v1/i18n/modules", resource_routes::<ModuleResource>())
        .nest(
            "/api/v1/i18n/translations",
            resource_routes::<TranslationResource>(),
        )
        .route("/api/v1/i18n/locales/{locale}", get(handlers::locale_bundle))
        .nest("/api/v1/users", users)
        .nest("/api/v1/roles", roles)
        .nest("/api/v1/departments", departments)
        .nest("/api/v1/menus", menus)
        .route("/api/v1/icons", get(handlers::list_icons))
}
