use std::sync::Arc;

use sqlx::PgPool;

use backoffice::application::translation_migration::{
    DEFAULT_BACKUP_TABLE, MigrationError, MigrationOptions, TranslationMigration,
};
use backoffice::infra::db::PgMigrationStore;

/// Replace the current table with the per-language layout older databases still carry.
async fn install_legacy_table(pool: &PgPool) {
    sqlx::query("DROP TABLE i18n_translations")
        .execute(pool)
        .await
        .expect("drop wide table");
    sqlx::query(
        r#"
        CREATE TABLE i18n_translations (
            id UUID PRIMARY KEY,
            language TEXT NOT NULL,
            module TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT,
            remark TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("create legacy table");

    let rows = [
        ("zh-CN", "common", "save", Some("保存"), None),
        ("en-US", "common", "save", Some("Save"), Some("toolbar button")),
        ("ar-SA", "common", "save", Some("حفظ"), None),
        ("en-US", "common", "cancel", Some("Cancel"), None),
        ("fr-FR", "common", "cancel", Some("Annuler"), None),
        ("zh-CN", "menu", "home", None, None),
    ];
    for (language, module, key, value, remark) in rows {
        sqlx::query(
            "INSERT INTO i18n_translations (id, language, module, key, value, remark) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(language)
        .bind(module)
        .bind(key)
        .bind(value)
        .bind(remark)
        .execute(pool)
        .await
        .expect("insert legacy row");
    }
}

fn migration(pool: &PgPool) -> TranslationMigration {
    TranslationMigration::new(Arc::new(PgMigrationStore::new(pool.clone())))
}

#[derive(Debug, sqlx::FromRow, PartialEq)]
struct WideRow {
    module: String,
    key: String,
    zh_cn: String,
    en_us: String,
    ar_sa: String,
    remark: Option<String>,
}

#[sqlx::test(migrations = "./migrations")]
async fn legacy_rows_fold_into_wide_rows(pool: PgPool) {
    install_legacy_table(&pool).await;

    let report = migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect("migration succeeds");

    assert_eq!(report.legacy_rows, 6);
    assert_eq!(report.merged_rows, 3);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.backup_table.as_deref(), Some(DEFAULT_BACKUP_TABLE));

    let rows: Vec<WideRow> = sqlx::query_as(
        "SELECT module, key, zh_cn, en_us, ar_sa, remark FROM i18n_translations ORDER BY module, key",
    )
    .fetch_all(&pool)
    .await
    .expect("wide rows");

    assert_eq!(
        rows,
        vec![
            WideRow {
                module: "common".into(),
                key: "cancel".into(),
                zh_cn: String::new(),
                en_us: "Cancel".into(),
                ar_sa: String::new(),
                remark: None,
            },
            WideRow {
                module: "common".into(),
                key: "save".into(),
                zh_cn: "保存".into(),
                en_us: "Save".into(),
                ar_sa: "حفظ".into(),
                remark: Some("toolbar button".into()),
            },
            WideRow {
                module: "menu".into(),
                key: "home".into(),
                zh_cn: String::new(),
                en_us: String::new(),
                ar_sa: String::new(),
                remark: None,
            },
        ]
    );

    let (backed_up,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {DEFAULT_BACKUP_TABLE}"))
            .fetch_one(&pool)
            .await
            .expect("backup count");
    assert_eq!(backed_up, 6);

    let duplicate = sqlx::query(
        "INSERT INTO i18n_translations (id, module, key) VALUES (gen_random_uuid(), 'common', 'save')",
    )
    .execute(&pool)
    .await;
    assert!(duplicate.is_err(), "(module, key) must stay unique");
}

#[sqlx::test(migrations = "./migrations")]
async fn second_run_reports_already_migrated(pool: PgPool) {
    install_legacy_table(&pool).await;
    migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect("first run");

    let err = migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect_err("second run must refuse");
    assert!(matches!(err, MigrationError::AlreadyMigrated { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn fresh_schema_is_already_wide(pool: PgPool) {
    let err = migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect_err("nothing to migrate");
    assert!(matches!(err, MigrationError::AlreadyMigrated { .. }));
}

#[sqlx::test(migrations = "./migrations")]
async fn dry_run_leaves_schema_untouched(pool: PgPool) {
    install_legacy_table(&pool).await;

    let report = migration(&pool)
        .run(&MigrationOptions {
            dry_run: true,
            ..MigrationOptions::default()
        })
        .await
        .expect("dry run");
    assert!(report.dry_run);
    assert_eq!(report.merged_rows, 3);
    assert!(report.backup_table.is_none());

    let (legacy,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM i18n_translations")
        .fetch_one(&pool)
        .await
        .expect("legacy count");
    assert_eq!(legacy, 6);

    let (backup_exists,): (bool,) = sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
        .bind(DEFAULT_BACKUP_TABLE)
        .fetch_one(&pool)
        .await
        .expect("backup lookup");
    assert!(!backup_exists);
}

#[sqlx::test(migrations = "./migrations")]
async fn existing_backup_table_blocks_the_run(pool: PgPool) {
    install_legacy_table(&pool).await;
    sqlx::query(&format!("CREATE TABLE {DEFAULT_BACKUP_TABLE} (id UUID)"))
        .execute(&pool)
        .await
        .expect("occupy backup name");

    let err = migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect_err("backup name taken");
    assert!(matches!(err, MigrationError::BackupExists { .. }));

    let (legacy,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM i18n_translations")
        .fetch_one(&pool)
        .await
        .expect("legacy count");
    assert_eq!(legacy, 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn serial_ids_enum_languages_and_naive_timestamps_are_read(pool: PgPool) {
    sqlx::query("DROP TABLE i18n_translations")
        .execute(&pool)
        .await
        .expect("drop wide table");
    sqlx::query("CREATE TYPE i18n_translations_language_enum AS ENUM ('zh-CN', 'en-US', 'ar-SA')")
        .execute(&pool)
        .await
        .expect("create enum");
    sqlx::query(
        r#"
        CREATE TABLE i18n_translations (
            id SERIAL PRIMARY KEY,
            language i18n_translations_language_enum NOT NULL,
            module VARCHAR(64) NOT NULL,
            key VARCHAR(128) NOT NULL,
            value TEXT,
            remark VARCHAR(255),
            created_at TIMESTAMP NOT NULL DEFAULT now(),
            updated_at TIMESTAMP NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("create legacy table");
    sqlx::query(
        "INSERT INTO i18n_translations (language, module, key, value) VALUES \
         ('en-US', 'common', 'ok', 'OK'), \
         ('zh-CN', 'common', 'ok', '确定'), \
         ('ar-SA', 'common', 'ok', 'موافق')",
    )
    .execute(&pool)
    .await
    .expect("insert legacy rows");

    let report = migration(&pool)
        .run(&MigrationOptions::default())
        .await
        .expect("migration succeeds");
    assert_eq!(report.legacy_rows, 3);
    assert_eq!(report.merged_rows, 1);
    assert_eq!(report.dropped_rows, 0);

    let row: WideRow = sqlx::query_as(
        "SELECT module, key, zh_cn, en_us, ar_sa, remark FROM i18n_translations",
    )
    .fetch_one(&pool)
    .await
    .expect("wide row");
    assert_eq!(
        row,
        WideRow {
            module: "common".into(),
            key: "ok".into(),
            zh_cn: "确定".into(),
            en_us: "OK".into(),
            ar_sa: "موافق".into(),
            remark: None,
        }
    );
}
