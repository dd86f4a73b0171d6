use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::roles::{CreateRole, RoleResource},
    application::pagination::PageWindow,
    application::repos::{RepoError, ResourceRepo},
    domain::entities::RoleRecord,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const ROLES: TableSpec = TableSpec {
    table: "roles",
    columns: "id, code, name, description, enabled, created_at, updated_at",
    keyword_columns: &["code", "name", "description"],
    soft_delete: true,
};

#[derive(sqlx::FromRow)]
pub(super) struct RoleRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    enabled: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<RoleRow> for RoleRecord {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            enabled: row.enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<RoleResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RoleRecord>, RepoError> {
        let row: Option<RoleRow> = listing::find_by_id(self.pool(), &ROLES, id).await?;
        Ok(row.map(RoleRecord::from))
    }

    async fn find_by_unique(&self, code: &String) -> Result<Option<RoleRecord>, RepoError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, code, name, description, enabled, created_at, updated_at
            FROM roles
            WHERE code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(RoleRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<RoleRecord>, RepoError> {
        let rows: Vec<RoleRow> = listing::list_window(self.pool(), &ROLES, window).await?;
        Ok(rows.into_iter().map(RoleRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &ROLES, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<RoleRecord>, RepoError> {
        let rows: Vec<RoleRow> = listing::list_all(self.pool(), &ROLES).await?;
        Ok(rows.into_iter().map(RoleRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &ROLES, ids).await
    }

    async fn insert(&self, input: CreateRole) -> Result<RoleRecord, RepoError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, code, name, description, enabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, name, description, enabled, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.code)
        .bind(input.name)
        .bind(input.description)
        .bind(input.enabled)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &RoleRecord) -> Result<RoleRecord, RepoError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET code = $2,
                name = $3,
                description = $4,
                enabled = $5,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, code, name, description, enabled, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.code)
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.enabled)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(RoleRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &ROLES, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &ROLES, ids).await
    }
}
