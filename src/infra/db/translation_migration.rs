//! Postgres side of the translation table restructuring.
//!
//! Table names reach these statements only after the application layer has
//! checked them as plain identifiers, so they are spliced into DDL directly.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::RepoError,
    application::translation_migration::{MigrationStore, MigrationTransaction, TableShape},
    domain::translations::{LegacyTranslationRow, MergedTranslation},
};

use super::map_sqlx_error;

const LEGACY_COLUMNS: [&str; 5] = ["id", "language", "module", "key", "value"];
const WIDE_COLUMNS: [&str; 6] = ["id", "module", "key", "zh_cn", "en_us", "ar_sa"];

/// Classify a table from its column names.
pub(crate) fn classify_columns(columns: &BTreeSet<String>) -> TableShape {
    if columns.is_empty() {
        return TableShape::Missing;
    }
    let has_all = |wanted: &[&str]| wanted.iter().all(|name| columns.contains(*name));
    if has_all(&LEGACY_COLUMNS) {
        TableShape::Legacy
    } else if has_all(&WIDE_COLUMNS) {
        TableShape::Wide
    } else {
        TableShape::Unrecognized
    }
}

/// Every column is cast to the type the reader decodes, so serial ids, enum
/// language columns and timestamps without time zone read the same way as
/// text and `timestamptz` columns.
pub(crate) fn legacy_select(table: &str, columns: &BTreeSet<String>) -> String {
    let optional = |name: &str, ty: &str| {
        if columns.contains(name) {
            format!("{name}::{ty} AS {name}")
        } else {
            format!("NULL::{ty} AS {name}")
        }
    };

    format!(
        "SELECT id::text AS id, language::text AS language, module::text AS module, \
         key::text AS key, value::text AS value, {remark}, {created}, {updated} \
         FROM {table} ORDER BY module, key, language",
        remark = optional("remark", "text"),
        created = optional("created_at", "timestamptz"),
        updated = optional("updated_at", "timestamptz"),
    )
}

#[derive(Clone)]
pub struct PgMigrationStore {
    pool: PgPool,
}

impl PgMigrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn column_names(&self, table: &str) -> Result<BTreeSet<String>, RepoError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT column_name::text
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

#[derive(sqlx::FromRow)]
struct LegacyRow {
    id: String,
    language: String,
    module: String,
    key: String,
    value: Option<String>,
    remark: Option<String>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl From<LegacyRow> for LegacyTranslationRow {
    fn from(row: LegacyRow) -> Self {
        let created_at = row.created_at.unwrap_or(OffsetDateTime::UNIX_EPOCH);
        Self {
            id: row.id,
            language: row.language,
            module: row.module,
            key: row.key,
            value: row.value.unwrap_or_default(),
            remark: row.remark,
            created_at,
            updated_at: row.updated_at.unwrap_or(created_at),
        }
    }
}

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn table_shape(&self, table: &str) -> Result<TableShape, RepoError> {
        let columns = self.column_names(table).await?;
        Ok(classify_columns(&columns))
    }

    async fn table_exists(&self, table: &str) -> Result<bool, RepoError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn fetch_legacy_rows(
        &self,
        table: &str,
    ) -> Result<Vec<LegacyTranslationRow>, RepoError> {
        let columns = self.column_names(table).await?;
        let sql = legacy_select(table, &columns);

        let rows = sqlx::query_as::<_, LegacyRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LegacyTranslationRow::from).collect())
    }

    async fn begin(&self) -> Result<Box<dyn MigrationTransaction>, RepoError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(PgMigrationTransaction { tx }))
    }
}

struct PgMigrationTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl MigrationTransaction for PgMigrationTransaction {
    async fn backup_table(&mut self, source: &str, backup: &str) -> Result<u64, RepoError> {
        let sql = format!("CREATE TABLE {backup} AS SELECT * FROM {source}");
        let result = sqlx::query(&sql)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), RepoError> {
        let sql = format!("DROP TABLE {table}");
        sqlx::query(&sql)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn create_wide_table(&mut self, table: &str) -> Result<(), RepoError> {
        let sql = format!(
            "CREATE TABLE {table} (
                id UUID PRIMARY KEY,
                module TEXT NOT NULL,
                key TEXT NOT NULL,
                zh_cn TEXT NOT NULL DEFAULT '',
                en_us TEXT NOT NULL DEFAULT '',
                ar_sa TEXT NOT NULL DEFAULT '',
                remark TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                CONSTRAINT {table}_module_key_key UNIQUE (module, key)
            )"
        );
        sqlx::query(&sql)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_rows(
        &mut self,
        table: &str,
        rows: &[MergedTranslation],
    ) -> Result<u64, RepoError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut ids = Vec::with_capacity(rows.len());
        let mut modules = Vec::with_capacity(rows.len());
        let mut keys = Vec::with_capacity(rows.len());
        let mut zh_cn = Vec::with_capacity(rows.len());
        let mut en_us = Vec::with_capacity(rows.len());
        let mut ar_sa = Vec::with_capacity(rows.len());
        let mut remarks = Vec::with_capacity(rows.len());
        let mut created = Vec::with_capacity(rows.len());
        let mut updated = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(Uuid::new_v4());
            modules.push(row.module.clone());
            keys.push(row.key.clone());
            zh_cn.push(row.zh_cn.clone());
            en_us.push(row.en_us.clone());
            ar_sa.push(row.ar_sa.clone());
            remarks.push(row.remark.clone());
            created.push(row.created_at);
            updated.push(row.updated_at);
        }

        let sql = format!(
            "INSERT INTO {table} \
                 (id, module, key, zh_cn, en_us, ar_sa, remark, created_at, updated_at) \
             SELECT * FROM UNNEST( \
                 $1::uuid[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[], \
                 $7::text[], $8::timestamptz[], $9::timestamptz[])"
        );
        let result = sqlx::query(&sql)
            .bind(ids)
            .bind(modules)
            .bind(keys)
            .bind(zh_cn)
            .bind(en_us)
            .bind(ar_sa)
            .bind(remarks)
            .bind(created)
            .bind(updated)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn narrow_table_is_legacy() {
        let shape = classify_columns(&columns(&[
            "id",
            "language",
            "module",
            "key",
            "value",
            "remark",
            "created_at",
        ]));
        assert_eq!(shape, TableShape::Legacy);
    }

    #[test]
    fn wide_table_is_recognised() {
        let shape = classify_columns(&columns(&[
            "id", "module", "key", "zh_cn", "en_us", "ar_sa", "remark",
        ]));
        assert_eq!(shape, TableShape::Wide);
    }

    #[test]
    fn no_columns_means_missing() {
        assert_eq!(classify_columns(&BTreeSet::new()), TableShape::Missing);
    }

    #[test]
    fn partial_layouts_are_unrecognized() {
        let shape = classify_columns(&columns(&["id", "module", "key", "value"]));
        assert_eq!(shape, TableShape::Unrecognized);
    }

    #[test]
    fn legacy_select_casts_every_decoded_column() {
        let sql = legacy_select(
            "i18n_translations",
            &columns(&["id", "language", "module", "key", "value", "created_at"]),
        );

        assert!(sql.contains("id::text AS id"));
        assert!(sql.contains("language::text AS language"));
        assert!(sql.contains("created_at::timestamptz AS created_at"));
        assert!(sql.contains("NULL::timestamptz AS updated_at"));
        assert!(sql.contains("NULL::text AS remark"));
    }
}
