use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use backoffice::application::error::AppError;
use backoffice::application::translation_migration::{
    MigrationOptions, MigrationReport, TranslationMigration,
};
use backoffice::config::{DatabaseSettings, RestructureTranslationsArgs};
use backoffice::infra::db::PgMigrationStore;
use backoffice::infra::error::InfraError;

pub async fn restructure_translations(
    database: &DatabaseSettings,
    args: &RestructureTranslationsArgs,
) -> Result<(), AppError> {
    let database_url = database.url.as_deref().ok_or_else(|| {
        AppError::validation(
            "database url is required (provide --database-url or set BACKOFFICE__DATABASE__URL/DATABASE_URL)",
        )
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
        .map_err(InfraError::from)?;

    let migration = TranslationMigration::new(Arc::new(PgMigrationStore::new(pool)));
    let options = MigrationOptions {
        backup_table: args.backup_table.clone(),
        dry_run: args.dry_run,
    };
    let report = migration.run(&options).await?;

    println!("{}", describe(&report));
    Ok(())
}

fn describe(report: &MigrationReport) -> String {
    let mut summary = format!(
        "{} legacy rows merged into {} translations",
        report.legacy_rows, report.merged_rows
    );
    if report.dropped_rows > 0 {
        summary.push_str(&format!(
            "; {} rows with unsupported languages skipped",
            report.dropped_rows
        ));
    }
    match (&report.backup_table, report.dry_run) {
        (_, true) => summary.push_str(" (dry run, nothing written)"),
        (Some(backup), false) => summary.push_str(&format!("; legacy rows kept in `{backup}`")),
        (None, false) => {}
    }
    summary
}
