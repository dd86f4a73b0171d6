use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::modules::{CreateModule, ModuleResource},
    application::pagination::PageWindow,
    application::repos::{RepoError, ResourceRepo},
    domain::entities::ModuleRecord,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const MODULES: TableSpec = TableSpec {
    table: "i18n_modules",
    columns: "id, code, name, description, remark, created_at, updated_at",
    keyword_columns: &["code", "name", "description"],
    soft_delete: false,
};

#[derive(sqlx::FromRow)]
struct ModuleRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    remark: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ModuleRow> for ModuleRecord {
    fn from(row: ModuleRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            remark: row.remark,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<ModuleResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModuleRecord>, RepoError> {
        let row: Option<ModuleRow> = listing::find_by_id(self.pool(), &MODULES, id).await?;
        Ok(row.map(ModuleRecord::from))
    }

    async fn find_by_unique(&self, code: &String) -> Result<Option<ModuleRecord>, RepoError> {
        let row = sqlx::query_as::<_, ModuleRow>(
            r#"
            SELECT id, code, name, description, remark, created_at, updated_at
            FROM i18n_modules
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ModuleRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<ModuleRecord>, RepoError> {
        let rows: Vec<ModuleRow> = listing::list_window(self.pool(), &MODULES, window).await?;
        Ok(rows.into_iter().map(ModuleRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &MODULES, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<ModuleRecord>, RepoError> {
        let rows: Vec<ModuleRow> = listing::list_all(self.pool(), &MODULES).await?;
        Ok(rows.into_iter().map(ModuleRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &MODULES, ids).await
    }

    async fn insert(&self, input: CreateModule) -> Result<ModuleRecord, RepoError> {
        let row = sqlx::query_as::<_, ModuleRow>(
            r#"
            INSERT INTO i18n_modules (id, code, name, description, remark)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, name, description, remark, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.code)
        .bind(input.name)
        .bind(input.description)
        .bind(input.remark)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &ModuleRecord) -> Result<ModuleRecord, RepoError> {
        let row = sqlx::query_as::<_, ModuleRow>(
            r#"
            UPDATE i18n_modules
            SET name = $2,
                description = $3,
                remark = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING id, code, name, description, remark, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.remark)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ModuleRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &MODULES, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &MODULES, ids).await
    }
}
