//! Query helpers shared by every resource table.

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, postgres::PgRow};
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::RepoError;

use super::util::map_sqlx_error;

/// Static description of a resource table.
pub(crate) struct TableSpec {
    pub table: &'static str,
    /// Comma separated select list matching the table's row struct.
    pub columns: &'static str,
    /// Columns searched by the listing keyword.
    pub keyword_columns: &'static [&'static str],
    /// Soft-deleted tables carry a nullable `deleted_at`.
    pub soft_delete: bool,
}

impl TableSpec {
    fn push_select<'q>(&self, qb: &mut QueryBuilder<'q, Postgres>) {
        qb.push("SELECT ");
        qb.push(self.columns);
        qb.push(" FROM ");
        qb.push(self.table);
        qb.push(" WHERE TRUE");
        self.push_live(qb);
    }

    fn push_live<'q>(&self, qb: &mut QueryBuilder<'q, Postgres>) {
        if self.soft_delete {
            qb.push(" AND deleted_at IS NULL");
        }
    }

    fn push_keyword<'q>(&self, qb: &mut QueryBuilder<'q, Postgres>, keyword: Option<&str>) {
        let Some(keyword) = keyword else {
            return;
        };
        if self.keyword_columns.is_empty() {
            return;
        }

        let pattern = format!("%{}%", escape_like(keyword));
        qb.push(" AND (");
        for (index, column) in self.keyword_columns.iter().enumerate() {
            if index > 0 {
                qb.push(" OR ");
            }
            qb.push(*column);
            qb.push(" LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" ESCAPE '\\'");
        }
        qb.push(")");
    }
}

/// Escape LIKE wildcards so the keyword matches literally.
pub(crate) fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub(crate) async fn find_by_id<T>(
    pool: &PgPool,
    spec: &TableSpec,
    id: Uuid,
) -> Result<Option<T>, RepoError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut qb = QueryBuilder::new("");
    spec.push_select(&mut qb);
    qb.push(" AND id = ");
    qb.push_bind(id);

    qb.build_query_as::<T>()
        .fetch_optional(pool)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn list_window<T>(
    pool: &PgPool,
    spec: &TableSpec,
    window: &PageWindow,
) -> Result<Vec<T>, RepoError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let offset = i64::try_from(window.offset())
        .map_err(|_| RepoError::from_persistence("page offset exceeds supported range"))?;

    let mut qb = QueryBuilder::new("");
    spec.push_select(&mut qb);
    spec.push_keyword(&mut qb, window.keyword());
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    qb.push_bind(i64::from(window.limit()));
    qb.push(" OFFSET ");
    qb.push_bind(offset);

    qb.build_query_as::<T>()
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn count(
    pool: &PgPool,
    spec: &TableSpec,
    keyword: Option<&str>,
) -> Result<u64, RepoError> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ");
    qb.push(spec.table);
    qb.push(" WHERE TRUE");
    spec.push_live(&mut qb);
    spec.push_keyword(&mut qb, keyword);

    let (total,): (i64,) = qb
        .build_query_as()
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;

    convert_count(total)
}

pub(crate) async fn list_all<T>(pool: &PgPool, spec: &TableSpec) -> Result<Vec<T>, RepoError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut qb = QueryBuilder::new("");
    spec.push_select(&mut qb);

    qb.build_query_as::<T>()
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)
}

pub(crate) async fn live_ids(
    pool: &PgPool,
    spec: &TableSpec,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, RepoError> {
    let mut qb = QueryBuilder::new("SELECT id FROM ");
    qb.push(spec.table);
    qb.push(" WHERE id = ANY(");
    qb.push_bind(ids.to_vec());
    qb.push(")");
    spec.push_live(&mut qb);

    let rows: Vec<(Uuid,)> = qb
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(map_sqlx_error)?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub(crate) async fn delete_one(pool: &PgPool, spec: &TableSpec, id: Uuid) -> Result<bool, RepoError> {
    let affected = delete_where(pool, spec, &[id]).await?;
    Ok(affected > 0)
}

pub(crate) async fn delete_many(
    pool: &PgPool,
    spec: &TableSpec,
    ids: &[Uuid],
) -> Result<u64, RepoError> {
    if ids.is_empty() {
        return Ok(0);
    }
    delete_where(pool, spec, ids).await
}

async fn delete_where(pool: &PgPool, spec: &TableSpec, ids: &[Uuid]) -> Result<u64, RepoError> {
    let mut qb = if spec.soft_delete {
        let mut qb = QueryBuilder::new("UPDATE ");
        qb.push(spec.table);
        qb.push(" SET deleted_at = now(), updated_at = now() WHERE deleted_at IS NULL AND ");
        qb
    } else {
        let mut qb = QueryBuilder::new("DELETE FROM ");
        qb.push(spec.table);
        qb.push(" WHERE ");
        qb
    };
    qb.push("id = ANY(");
    qb.push_bind(ids.to_vec());
    qb.push(")");

    let result = qb.build().execute(pool).await.map_err(map_sqlx_error)?;
    Ok(result.rows_affected())
}

pub(crate) fn convert_count(value: i64) -> Result<u64, RepoError> {
    value
        .try_into()
        .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
}
