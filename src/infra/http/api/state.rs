use std::sync::Arc;

use crate::application::admin::departments::DepartmentResource;
use crate::application::admin::menus::MenuResource;
use crate::application::admin::modules::ModuleResource;
use crate::application::admin::roles::RoleResource;
use crate::application::admin::translations::TranslationResource;
use crate::application::admin::users::UserResource;
use crate::application::admin::{AssignmentService, BundleService, Resource, ResourceService};
use crate::application::repos::ResourceRepo;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct ApiState {
    pub modules: Arc<ResourceService<ModuleResource>>,
    pub translations: Arc<ResourceService<TranslationResource>>,
    pub users: Arc<ResourceService<UserResource>>,
    pub roles: Arc<ResourceService<RoleResource>>,
    pub departments: Arc<ResourceService<DepartmentResource>>,
    pub menus: Arc<ResourceService<MenuResource>>,
    pub assignments: Arc<AssignmentService>,
    pub bundles: Arc<BundleService>,
    pub db: Arc<PostgresRepositories>,
}

impl ApiState {
    /// Wire every service onto the Postgres repositories.
    pub fn new(db: Arc<PostgresRepositories>, max_page_size: u32) -> Self {
        Self {
            modules: service::<ModuleResource>(db.clone(), max_page_size),
            translations: service::<TranslationResource>(db.clone(), max_page_size),
            users: service::<UserResource>(db.clone(), max_page_size),
            roles: service::<RoleResource>(db.clone(), max_page_size),
            departments: service::<DepartmentResource>(db.clone(), max_page_size),
            menus: service::<MenuResource>(db.clone(), max_page_size),
            assignments: Arc::new(AssignmentService::new(
                db.clone(),
                db.clone(),
                db.clone(),
                db.clone(),
                db.clone(),
            )),
            bundles: Arc::new(BundleService::new(db.clone())),
            db,
        }
    }
}

fn service<R: Resource>(
    repo: Arc<dyn ResourceRepo<R>>,
    max_page_size: u32,
) -> Arc<ResourceService<R>> {
    Arc::new(ResourceService::new(repo).with_max_page_size(max_page_size))
}
