use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::repos::{RepoError, RoleMenusRepo, UserRolesRepo},
    domain::entities::{MenuRecord, RoleRecord},
};

use super::{PostgresRepositories, map_sqlx_error, menus::MenuRow, roles::RoleRow};

#[async_trait]
impl UserRolesRepo for PostgresRepositories {
    async fn list_user_roles(&self, user_id: Uuid) -> Result<Vec<RoleRecord>, RepoError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.code, r.name, r.description, r.enabled, r.created_at, r.updated_at
            FROM user_roles ur
            INNER JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1 AND r.deleted_at IS NULL
            ORDER BY r.code
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RoleRecord::from).collect())
    }

    async fn replace_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if !role_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                SELECT $1, id
                FROM UNNEST($2::uuid[]) AS id
                "#,
            )
            .bind(user_id)
            .bind(role_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl RoleMenusRepo for PostgresRepositories {
    async fn list_role_menus(&self, role_id: Uuid) -> Result<Vec<MenuRecord>, RepoError> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT m.id, m.code, m.name, m.parent_id, m.kind, m.path, m.icon, m.sort_order,
                   m.visible, m.created_at, m.updated_at
            FROM role_menus rm
            INNER JOIN menus m ON m.id = rm.menu_id
            WHERE rm.role_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.sort_order, m.code
            "#,
        )
        .bind(role_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MenuRecord::from).collect())
    }

    async fn replace_role_menus(&self, role_id: Uuid, menu_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM role_menus WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if !menu_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO role_menus (role_id, menu_id)
                SELECT $1, id
                FROM UNNEST($2::uuid[]) AS id
                "#,
            )
            .bind(role_id)
            .bind(menu_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(())
    }
}
