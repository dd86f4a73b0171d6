use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::departments::{CreateDepartment, DepartmentResource},
    application::pagination::PageWindow,
    application::repos::{RepoError, ResourceRepo},
    domain::entities::DepartmentRecord,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const DEPARTMENTS: TableSpec = TableSpec {
    table: "departments",
    columns: "id, code, name, parent_id, sort_order, leader, remark, created_at, updated_at",
    keyword_columns: &["code", "name", "leader"],
    soft_delete: true,
};

#[derive(sqlx::FromRow)]
struct DepartmentRow {
    id: Uuid,
    code: String,
    name: String,
    parent_id: Option<Uuid>,
    sort_order: i32,
    leader: Option<String>,
    remark: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DepartmentRow> for DepartmentRecord {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            parent_id: row.parent_id,
            sort_order: row.sort_order,
            leader: row.leader,
            remark: row.remark,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<DepartmentResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DepartmentRecord>, RepoError> {
        let row: Option<DepartmentRow> = listing::find_by_id(self.pool(), &DEPARTMENTS, id).await?;
        Ok(row.map(DepartmentRecord::from))
    }

    async fn find_by_unique(&self, code: &String) -> Result<Option<DepartmentRecord>, RepoError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, code, name, parent_id, sort_order, leader, remark, created_at, updated_at
            FROM departments
            WHERE code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(DepartmentRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<DepartmentRecord>, RepoError> {
        let rows: Vec<DepartmentRow> =
            listing::list_window(self.pool(), &DEPARTMENTS, window).await?;
        Ok(rows.into_iter().map(DepartmentRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &DEPARTMENTS, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<DepartmentRecord>, RepoError> {
        let rows: Vec<DepartmentRow> = listing::list_all(self.pool(), &DEPARTMENTS).await?;
        Ok(rows.into_iter().map(DepartmentRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &DEPARTMENTS, ids).await
    }

    async fn insert(&self, input: CreateDepartment) -> Result<DepartmentRecord, RepoError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            INSERT INTO departments (id, code, name, parent_id, sort_order, leader, remark)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, code, name, parent_id, sort_order, leader, remark, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.code)
        .bind(input.name)
        .bind(input.parent_id)
        .bind(input.sort_order)
        .bind(input.leader)
        .bind(input.remark)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &DepartmentRecord) -> Result<DepartmentRecord, RepoError> {
        let row = sqlx::query_as::<_, DepartmentRow>(
            r#"
            UPDATE departments
            SET code = $2,
                name = $3,
                parent_id = $4,
                sort_order = $5,
                leader = $6,
                remark = $7,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, code, name, parent_id, sort_order, leader, remark, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.code)
        .bind(&record.name)
        .bind(record.parent_id)
        .bind(record.sort_order)
        .bind(&record.leader)
        .bind(&record.remark)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(DepartmentRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &DEPARTMENTS, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &DEPARTMENTS, ids).await
    }
}
