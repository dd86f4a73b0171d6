use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::users::{CreateUser, UserResource},
    application::pagination::PageWindow,
    application::repos::{RepoError, ResourceRepo},
    domain::entities::UserRecord,
    domain::types::UserStatus,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const USERS: TableSpec = TableSpec {
    table: "users",
    columns: "id, username, nickname, email, phone, department_id, status, remark, \
              created_at, updated_at",
    keyword_columns: &["username", "nickname", "email", "phone"],
    soft_delete: true,
};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    nickname: String,
    email: Option<String>,
    phone: Option<String>,
    department_id: Option<Uuid>,
    status: UserStatus,
    remark: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            nickname: row.nickname,
            email: row.email,
            phone: row.phone,
            department_id: row.department_id,
            status: row.status,
            remark: row.remark,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<UserResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        let row: Option<UserRow> = listing::find_by_id(self.pool(), &USERS, id).await?;
        Ok(row.map(UserRecord::from))
    }

    async fn find_by_unique(&self, username: &String) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, nickname, email, phone, department_id, status, remark,
                   created_at, updated_at
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<UserRecord>, RepoError> {
        let rows: Vec<UserRow> = listing::list_window(self.pool(), &USERS, window).await?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &USERS, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<UserRecord>, RepoError> {
        let rows: Vec<UserRow> = listing::list_all(self.pool(), &USERS).await?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &USERS, ids).await
    }

    async fn insert(&self, input: CreateUser) -> Result<UserRecord, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, nickname, email, phone, department_id, status, remark)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, nickname, email, phone, department_id, status, remark,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.username)
        .bind(input.nickname)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.department_id)
        .bind(input.status)
        .bind(input.remark)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &UserRecord) -> Result<UserRecord, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET nickname = $2,
                email = $3,
                phone = $4,
                department_id = $5,
                status = $6,
                remark = $7,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, username, nickname, email, phone, department_id, status, remark,
                      created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.nickname)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(record.department_id)
        .bind(record.status)
        .bind(&record.remark)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &USERS, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &USERS, ids).await
    }
}
