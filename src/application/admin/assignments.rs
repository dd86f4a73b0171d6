//! Role membership of users and menu grants of roles.

use std::collections::HashSet;
use std::sync::Arc;

use metrics::counter;
use tracing::info;
use uuid::Uuid;

use crate::application::admin::menus::MenuResource;
use crate::application::admin::resource::{METRIC_RESOURCE_MUTATIONS, Resource, ResourceError};
use crate::application::admin::roles::RoleResource;
use crate::application::admin::users::UserResource;
use crate::application::repos::{ResourceRepo, RoleMenusRepo, UserRolesRepo};
use crate::domain::entities::{MenuRecord, RoleRecord};

#[derive(Clone)]
pub struct AssignmentService {
    users: Arc<dyn ResourceRepo<UserResource>>,
    roles: Arc<dyn ResourceRepo<RoleResource>>,
    menus: Arc<dyn ResourceRepo<MenuResource>>,
    user_roles: Arc<dyn UserRolesRepo>,
    role_menus: Arc<dyn RoleMenusRepo>,
}

impl AssignmentService {
    pub fn new(
        users: Arc<dyn ResourceRepo<UserResource>>,
        roles: Arc<dyn ResourceRepo<RoleResource>>,
        menus: Arc<dyn ResourceRepo<MenuResource>>,
        user_roles: Arc<dyn UserRolesRepo>,
        role_menus: Arc<dyn RoleMenusRepo>,
    ) -> Self {
        Self {
            users,
            roles,
            menus,
            user_roles,
            role_menus,
        }
    }

    pub async fn roles_of_user(&self, user_id: Uuid) -> Result<Vec<RoleRecord>, ResourceError> {
        ensure_live::<UserResource>(self.users.as_ref(), user_id).await?;
        Ok(self.user_roles.list_user_roles(user_id).await?)
    }

    /// Replace the user's roles with exactly `role_ids`.
    pub async fn assign_user_roles(
        &self,
        user_id: Uuid,
        role_ids: Vec<Uuid>,
    ) -> Result<Vec<RoleRecord>, ResourceError> {
        ensure_live::<UserResource>(self.users.as_ref(), user_id).await?;
        let role_ids = dedup(role_ids);
        ensure_all_live::<RoleResource>(self.roles.as_ref(), &role_ids).await?;

        self.user_roles.replace_user_roles(user_id, &role_ids).await?;

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => "user_roles", "op" => "replace")
            .increment(1);
        info!(
            target = "application::admin::assignments",
            user_id = %user_id,
            roles = role_ids.len(),
            "replaced user roles"
        );
        Ok(self.user_roles.list_user_roles(user_id).await?)
    }

    pub async fn menus_of_role(&self, role_id: Uuid) -> Result<Vec<MenuRecord>, ResourceError> {
        ensure_live::<RoleResource>(self.roles.as_ref(), role_id).await?;
        Ok(self.role_menus.list_role_menus(role_id).await?)
    }

    /// Replace the role's menu grants with exactly `menu_ids`.
    pub async fn assign_role_menus(
        &self,
        role_id: Uuid,
        menu_ids: Vec<Uuid>,
    ) -> Result<Vec<MenuRecord>, ResourceError> {
        ensure_live::<RoleResource>(self.roles.as_ref(), role_id).await?;
        let menu_ids = dedup(menu_ids);
        ensure_all_live::<MenuResource>(self.menus.as_ref(), &menu_ids).await?;

        self.role_menus.replace_role_menus(role_id, &menu_ids).await?;

        counter!(METRIC_RESOURCE_MUTATIONS, "entity" => "role_menus", "op" => "replace")
            .increment(1);
        info!(
            target = "application::admin::assignments",
            role_id = %role_id,
            menus = menu_ids.len(),
            "replaced role menus"
        );
        Ok(self.role_menus.list_role_menus(role_id).await?)
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

async fn ensure_live<R: Resource>(
    repo: &dyn ResourceRepo<R>,
    id: Uuid,
) -> Result<(), ResourceError> {
    match repo.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ResourceError::NotFound {
            entity: R::ENTITY,
            id,
        }),
    }
}

async fn ensure_all_live<R: Resource>(
    repo: &dyn ResourceRepo<R>,
    ids: &[Uuid],
) -> Result<(), ResourceError> {
    if ids.is_empty() {
        return Ok(());
    }

    let live: HashSet<Uuid> = repo.live_ids(ids).await?.into_iter().collect();
    let unknown: Vec<String> = ids
        .iter()
        .filter(|id| !live.contains(id))
        .map(Uuid::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ResourceError::validation(
            R::ENTITY,
            format!("unknown {} ids: {}", R::ENTITY, unknown.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::application::admin::testing::InMemoryRepo;
    use crate::application::repos::RepoError;
    use crate::domain::entities::UserRecord;
    use crate::domain::types::UserStatus;

    #[derive(Default)]
    struct RecordingJoins {
        user_roles: Mutex<HashMap<Uuid, Vec<Uuid>>>,
        roles: Vec<RoleRecord>,
    }

    #[async_trait]
    impl UserRolesRepo for RecordingJoins {
        async fn list_user_roles(&self, user_id: Uuid) -> Result<Vec<RoleRecord>, RepoError> {
            let assigned = self
                .user_roles
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default();
            Ok(self
                .roles
                .iter()
                .filter(|role| assigned.contains(&role.id))
                .cloned()
                .collect())
        }

        async fn replace_user_roles(
            &self,
            user_id: Uuid,
            role_ids: &[Uuid],
        ) -> Result<(), RepoError> {
            self.user_roles
                .lock()
                .unwrap()
                .insert(user_id, role_ids.to_vec());
            Ok(())
        }
    }

    #[async_trait]
    impl RoleMenusRepo for RecordingJoins {
        async fn list_role_menus(&self, _role_id: Uuid) -> Result<Vec<MenuRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn replace_role_menus(
            &self,
            _role_id: Uuid,
            _menu_ids: &[Uuid],
        ) -> Result<(), RepoError> {
            Ok(())
        }
    }

    fn user() -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            username: "alice".into(),
            nickname: "Alice".into(),
            email: None,
            phone: None,
            department_id: None,
            status: UserStatus::Enabled,
            remark: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn role(code: &str) -> RoleRecord {
        RoleRecord {
            id: Uuid::new_v4(),
            code: code.into(),
            name: code.into(),
            description: None,
            enabled: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn service(users: Vec<UserRecord>, roles: Vec<RoleRecord>) -> (AssignmentService, Arc<RecordingJoins>) {
        let joins = Arc::new(RecordingJoins {
            roles: roles.clone(),
            ..RecordingJoins::default()
        });
        let service = AssignmentService::new(
            Arc::new(InMemoryRepo::<UserResource>::with_rows(users)),
            Arc::new(InMemoryRepo::<RoleResource>::with_rows(roles)),
            Arc::new(InMemoryRepo::<MenuResource>::default()),
            joins.clone(),
            joins.clone(),
        );
        (service, joins)
    }

    #[tokio::test]
    async fn assigning_roles_replaces_the_set() {
        let alice = user();
        let admin = role("admin");
        let editor = role("editor");
        let (service, joins) = service(vec![alice.clone()], vec![admin.clone(), editor.clone()]);

        service
            .assign_user_roles(alice.id, vec![admin.id, editor.id])
            .await
            .unwrap();
        let roles = service
            .assign_user_roles(alice.id, vec![editor.id, editor.id])
            .await
            .unwrap();

        assert_eq!(roles.iter().map(|r| r.id).collect::<Vec<_>>(), vec![editor.id]);
        assert_eq!(
            joins.user_roles.lock().unwrap().get(&alice.id),
            Some(&vec![editor.id])
        );
    }

    #[tokio::test]
    async fn unknown_role_ids_are_rejected_without_writing() {
        let alice = user();
        let (service, joins) = service(vec![alice.clone()], vec![role("admin")]);
        let missing = Uuid::new_v4();

        let err = service
            .assign_user_roles(alice.id, vec![missing])
            .await
            .unwrap_err();

        match err {
            ResourceError::Validation { message, .. } => {
                assert!(message.contains(&missing.to_string()))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(joins.user_roles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_owner_is_not_found() {
        let (service, _) = service(Vec::new(), Vec::new());

        let err = service.roles_of_user(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, ResourceError::NotFound { entity: "user", .. }));
    }

    #[tokio::test]
    async fn empty_assignment_clears_roles() {
        let alice = user();
        let admin = role("admin");
        let (service, _) = service(vec![alice.clone()], vec![admin.clone()]);
        service
            .assign_user_roles(alice.id, vec![admin.id])
            .await
            .unwrap();

        let roles = service.assign_user_roles(alice.id, Vec::new()).await.unwrap();

        assert!(roles.is_empty());
    }
}
