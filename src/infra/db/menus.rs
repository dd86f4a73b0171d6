use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::menus::{CreateMenu, MenuResource},
    application::pagination::PageWindow,
    application::repos::{RepoError, ResourceRepo},
    domain::entities::MenuRecord,
    domain::types::MenuKind,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const MENUS: TableSpec = TableSpec {
    table: "menus",
    columns: "id, code, name, parent_id, kind, path, icon, sort_order, visible, \
              created_at, updated_at",
    keyword_columns: &["code", "name", "path"],
    soft_delete: true,
};

#[derive(sqlx::FromRow)]
pub(super) struct MenuRow {
    id: Uuid,
    code: String,
    name: String,
    parent_id: Option<Uuid>,
    kind: MenuKind,
    path: Option<String>,
    icon: Option<String>,
    sort_order: i32,
    visible: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<MenuRow> for MenuRecord {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            parent_id: row.parent_id,
            kind: row.kind,
            path: row.path,
            icon: row.icon,
            sort_order: row.sort_order,
            visible: row.visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<MenuResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuRecord>, RepoError> {
        let row: Option<MenuRow> = listing::find_by_id(self.pool(), &MENUS, id).await?;
        Ok(row.map(MenuRecord::from))
    }

    async fn find_by_unique(&self, code: &String) -> Result<Option<MenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, code, name, parent_id, kind, path, icon, sort_order, visible,
                   created_at, updated_at
            FROM menus
            WHERE code = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<MenuRecord>, RepoError> {
        let rows: Vec<MenuRow> = listing::list_window(self.pool(), &MENUS, window).await?;
        Ok(rows.into_iter().map(MenuRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &MENUS, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<MenuRecord>, RepoError> {
        let rows: Vec<MenuRow> = listing::list_all(self.pool(), &MENUS).await?;
        Ok(rows.into_iter().map(MenuRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &MENUS, ids).await
    }

    async fn insert(&self, input: CreateMenu) -> Result<MenuRecord, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            INSERT INTO menus (id, code, name, parent_id, kind, path, icon, sort_order, visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, code, name, parent_id, kind, path, icon, sort_order, visible,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.code)
        .bind(input.name)
        .bind(input.parent_id)
        .bind(input.kind)
        .bind(input.path)
        .bind(input.icon)
        .bind(input.sort_order)
        .bind(input.visible)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &MenuRecord) -> Result<MenuRecord, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            UPDATE menus
            SET code = $2,
                name = $3,
                parent_id = $4,
                kind = $5,
                path = $6,
                icon = $7,
                sort_order = $8,
                visible = $9,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, code, name, parent_id, kind, path, icon, sort_order, visible,
                      created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.code)
        .bind(&record.name)
        .bind(record.parent_id)
        .bind(record.kind)
        .bind(&record.path)
        .bind(&record.icon)
        .bind(record.sort_order)
        .bind(record.visible)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(MenuRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &MENUS, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &MENUS, ids).await
    }
}
