use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::admin::translations::{CreateTranslation, TranslationKey, TranslationResource},
    application::pagination::PageWindow,
    application::repos::{BundleEntry, RepoError, ResourceRepo, TranslationBundleRepo},
    domain::entities::TranslationRecord,
    domain::locale::Locale,
};

use super::{
    PostgresRepositories,
    listing::{self, TableSpec},
    map_sqlx_error,
};

const TRANSLATIONS: TableSpec = TableSpec {
    table: "i18n_translations",
    columns: "id, module, key, zh_cn, en_us, ar_sa, remark, created_at, updated_at",
    keyword_columns: &["module", "key", "zh_cn", "en_us", "ar_sa"],
    soft_delete: false,
};

#[derive(sqlx::FromRow)]
struct TranslationRow {
    id: Uuid,
    module: String,
    key: String,
    zh_cn: String,
    en_us: String,
    ar_sa: String,
    remark: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TranslationRow> for TranslationRecord {
    fn from(row: TranslationRow) -> Self {
        Self {
            id: row.id,
            module: row.module,
            key: row.key,
            zh_cn: row.zh_cn,
            en_us: row.en_us,
            ar_sa: row.ar_sa,
            remark: row.remark,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResourceRepo<TranslationResource> for PostgresRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TranslationRecord>, RepoError> {
        let row: Option<TranslationRow> =
            listing::find_by_id(self.pool(), &TRANSLATIONS, id).await?;
        Ok(row.map(TranslationRecord::from))
    }

    async fn find_by_unique(
        &self,
        key: &TranslationKey,
    ) -> Result<Option<TranslationRecord>, RepoError> {
        let row = sqlx::query_as::<_, TranslationRow>(
            r#"
            SELECT id, module, key, zh_cn, en_us, ar_sa, remark, created_at, updated_at
            FROM i18n_translations
            WHERE module = $1 AND key = $2
            "#,
        )
        .bind(&key.module)
        .bind(&key.key)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TranslationRecord::from))
    }

    async fn list(&self, window: &PageWindow) -> Result<Vec<TranslationRecord>, RepoError> {
        let rows: Vec<TranslationRow> =
            listing::list_window(self.pool(), &TRANSLATIONS, window).await?;
        Ok(rows.into_iter().map(TranslationRecord::from).collect())
    }

    async fn count(&self, keyword: Option<&str>) -> Result<u64, RepoError> {
        listing::count(self.pool(), &TRANSLATIONS, keyword).await
    }

    async fn list_all(&self) -> Result<Vec<TranslationRecord>, RepoError> {
        let rows: Vec<TranslationRow> = listing::list_all(self.pool(), &TRANSLATIONS).await?;
        Ok(rows.into_iter().map(TranslationRecord::from).collect())
    }

    async fn live_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        listing::live_ids(self.pool(), &TRANSLATIONS, ids).await
    }

    async fn insert(&self, input: CreateTranslation) -> Result<TranslationRecord, RepoError> {
        let row = sqlx::query_as::<_, TranslationRow>(
            r#"
            INSERT INTO i18n_translations (id, module, key, zh_cn, en_us, ar_sa, remark)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, module, key, zh_cn, en_us, ar_sa, remark, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.module)
        .bind(input.key)
        .bind(input.zh_cn)
        .bind(input.en_us)
        .bind(input.ar_sa)
        .bind(input.remark)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, record: &TranslationRecord) -> Result<TranslationRecord, RepoError> {
        let row = sqlx::query_as::<_, TranslationRow>(
            r#"
            UPDATE i18n_translations
            SET zh_cn = $2,
                en_us = $3,
                ar_sa = $4,
                remark = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, module, key, zh_cn, en_us, ar_sa, remark, created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.zh_cn)
        .bind(&record.en_us)
        .bind(&record.ar_sa)
        .bind(&record.remark)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(TranslationRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        listing::delete_one(self.pool(), &TRANSLATIONS, id).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepoError> {
        listing::delete_many(self.pool(), &TRANSLATIONS, ids).await
    }
}

#[derive(sqlx::FromRow)]
struct BundleRow {
    module: String,
    key: String,
    value: String,
}

#[async_trait]
impl TranslationBundleRepo for PostgresRepositories {
    async fn locale_entries(&self, locale: Locale) -> Result<Vec<BundleEntry>, RepoError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT module, key, ");
        qb.push(locale.column());
        qb.push(" AS value FROM i18n_translations ORDER BY module, key");

        let rows: Vec<BundleRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| BundleEntry {
                module: row.module,
                key: row.key,
                value: row.value,
            })
            .collect())
    }
}
