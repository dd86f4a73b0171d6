//! One-shot restructuring of the per-language translation table into one row
//! per `(module, key)`.
//!
//! The run has a read phase and a destructive phase. Reading and merging
//! happen outside any transaction and abort before the schema is touched.
//! Backing up, dropping, recreating and filling the table happen inside a
//! single transaction that is rolled back on the first failing step.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::repos::RepoError;
use crate::domain::translations::{LegacyTranslationRow, MergedTranslation, merge_legacy_rows};

pub const TRANSLATION_TABLE: &str = "i18n_translations";
pub const DEFAULT_BACKUP_TABLE: &str = "i18n_translations_legacy_backup";

pub const METRIC_MIGRATED_ROWS: &str = "backoffice_translation_migration_rows_total";

/// Layout of the translation table as found in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    Missing,
    /// One row per `(module, key, language)`.
    Legacy,
    /// One row per `(module, key)` with a column per locale.
    Wide,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStep {
    Begin,
    Backup,
    DropLegacy,
    CreateTable,
    InsertRows,
    Commit,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MigrationStep::Begin => "begin",
            MigrationStep::Backup => "backup",
            MigrationStep::DropLegacy => "drop legacy table",
            MigrationStep::CreateTable => "create table",
            MigrationStep::InsertRows => "insert rows",
            MigrationStep::Commit => "commit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("table `{table}` does not exist")]
    MissingLegacyTable { table: String },
    #[error("table `{table}` already has one row per module and key")]
    AlreadyMigrated { table: String },
    #[error("table `{table}` has neither the legacy nor the current layout")]
    UnrecognizedLayout { table: String },
    #[error("backup table `{table}` already exists")]
    BackupExists { table: String },
    #[error("`{name}` is not a valid table name")]
    InvalidTableName { name: String },
    #[error("failed to read legacy translations")]
    Read(#[source] RepoError),
    #[error("step `{step}` failed; all changes were rolled back")]
    Step {
        step: MigrationStep,
        #[source]
        source: RepoError,
    },
    #[error("step `{step}` failed and rolling back failed too: {rollback}")]
    RollbackFailed {
        step: MigrationStep,
        #[source]
        source: RepoError,
        rollback: RepoError,
    },
}

/// Read side of the migration plus the entry point into the destructive phase.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    async fn table_shape(&self, table: &str) -> Result<TableShape, RepoError>;

    async fn table_exists(&self, table: &str) -> Result<bool, RepoError>;

    /// Every legacy row ordered by `(module, key, language)`.
    async fn fetch_legacy_rows(&self, table: &str)
    -> Result<Vec<LegacyTranslationRow>, RepoError>;

    async fn begin(&self) -> Result<Box<dyn MigrationTransaction>, RepoError>;
}

/// Destructive steps. Nothing is visible outside until [`Self::commit`].
#[async_trait]
pub trait MigrationTransaction: Send {
    /// Copy `source` into a new table `backup`, returning the copied row count.
    async fn backup_table(&mut self, source: &str, backup: &str) -> Result<u64, RepoError>;

    async fn drop_table(&mut self, table: &str) -> Result<(), RepoError>;

    async fn create_wide_table(&mut self, table: &str) -> Result<(), RepoError>;

    async fn insert_rows(
        &mut self,
        table: &str,
        rows: &[MergedTranslation],
    ) -> Result<u64, RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    pub backup_table: String,
    pub dry_run: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            backup_table: DEFAULT_BACKUP_TABLE.to_string(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub legacy_rows: usize,
    pub merged_rows: usize,
    pub dropped_rows: usize,
    pub backup_table: Option<String>,
    pub dry_run: bool,
}

#[derive(Clone)]
pub struct TranslationMigration {
    store: Arc<dyn MigrationStore>,
}

impl TranslationMigration {
    pub fn new(store: Arc<dyn MigrationStore>) -> Self {
        Self { store }
    }

    pub async fn run(&self, options: &MigrationOptions) -> Result<MigrationReport, MigrationError> {
        ensure_identifier(&options.backup_table)?;

        match self
            .store
            .table_shape(TRANSLATION_TABLE)
            .await
            .map_err(MigrationError::Read)?
        {
            TableShape::Legacy => {}
            TableShape::Missing => {
                return Err(MigrationError::MissingLegacyTable {
                    table: TRANSLATION_TABLE.to_string(),
                });
            }
            TableShape::Wide => {
                return Err(MigrationError::AlreadyMigrated {
                    table: TRANSLATION_TABLE.to_string(),
                });
            }
            TableShape::Unrecognized => {
                return Err(MigrationError::UnrecognizedLayout {
                    table: TRANSLATION_TABLE.to_string(),
                });
            }
        }

        let rows = self
            .store
            .fetch_legacy_rows(TRANSLATION_TABLE)
            .await
            .map_err(MigrationError::Read)?;
        let legacy_rows = rows.len();
        let outcome = merge_legacy_rows(rows);

        info!(
            target = "application::translation_migration",
            legacy_rows,
            merged_rows = outcome.rows.len(),
            dropped_rows = outcome.dropped,
            "merged legacy translations"
        );
        if outcome.dropped > 0 {
            warn!(
                target = "application::translation_migration",
                dropped_rows = outcome.dropped,
                "rows with unsupported language tags will not be carried over"
            );
        }

        let mut report = MigrationReport {
            legacy_rows,
            merged_rows: outcome.rows.len(),
            dropped_rows: outcome.dropped,
            backup_table: None,
            dry_run: options.dry_run,
        };

        if options.dry_run {
            info!(
                target = "application::translation_migration",
                "dry run; schema left untouched"
            );
            return Ok(report);
        }

        if self
            .store
            .table_exists(&options.backup_table)
            .await
            .map_err(MigrationError::Read)?
        {
            return Err(MigrationError::BackupExists {
                table: options.backup_table.clone(),
            });
        }

        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|source| MigrationError::Step {
                step: MigrationStep::Begin,
                source,
            })?;

        if let Err((step, source)) =
            apply(tx.as_mut(), &options.backup_table, &outcome.rows).await
        {
            error!(
                target = "application::translation_migration",
                %step,
                error = %source,
                "migration step failed; rolling back"
            );
            return Err(match tx.rollback().await {
                Ok(()) => MigrationError::Step { step, source },
                Err(rollback) => MigrationError::RollbackFailed {
                    step,
                    source,
                    rollback,
                },
            });
        }

        tx.commit().await.map_err(|source| MigrationError::Step {
            step: MigrationStep::Commit,
            source,
        })?;

        counter!(METRIC_MIGRATED_ROWS).increment(report.merged_rows as u64);
        info!(
            target = "application::translation_migration",
            backup_table = %options.backup_table,
            merged_rows = report.merged_rows,
            "translation table restructured"
        );

        report.backup_table = Some(options.backup_table.clone());
        Ok(report)
    }
}

async fn apply(
    tx: &mut dyn MigrationTransaction,
    backup_table: &str,
    rows: &[MergedTranslation],
) -> Result<(), (MigrationStep, RepoError)> {
    let copied = tx
        .backup_table(TRANSLATION_TABLE, backup_table)
        .await
        .map_err(|err| (MigrationStep::Backup, err))?;
    info!(
        target = "application::translation_migration",
        backup_table,
        copied,
        "legacy table backed up"
    );

    tx.drop_table(TRANSLATION_TABLE)
        .await
        .map_err(|err| (MigrationStep::DropLegacy, err))?;

    tx.create_wide_table(TRANSLATION_TABLE)
        .await
        .map_err(|err| (MigrationStep::CreateTable, err))?;

    let inserted = tx
        .insert_rows(TRANSLATION_TABLE, rows)
        .await
        .map_err(|err| (MigrationStep::InsertRows, err))?;
    if inserted != rows.len() as u64 {
        return Err((
            MigrationStep::InsertRows,
            RepoError::Integrity {
                message: format!("inserted {inserted} of {} rows", rows.len()),
            },
        ));
    }

    Ok(())
}

/// Table names are interpolated into DDL, so only plain lowercase
/// identifiers are accepted.
pub fn ensure_identifier(name: &str) -> Result<(), MigrationError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(first) if first.is_ascii_lowercase() || first == '_')
        && chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        && name.len() <= 63;

    if valid {
        Ok(())
    } else {
        Err(MigrationError::InvalidTableName {
            name: name.to_string(),
        })
    }
}
