//! # Storage Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied when the database opens. `_sqlx_migrations` records what ran.
//!
//! Add a new `NNN_description.sql` for every schema change; applied files
//! are checksummed and must not be edited.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. Safe to call on every start.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying storage migrations");

    MIGRATOR.run(pool).await?;

    info!("Storage schema up to date");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
///
/// A database that never ran migrations reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let has_table: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: i64 = if has_table {
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?
    } else {
        0
    };

    Ok((MIGRATOR.migrations.len(), usize::try_from(applied).unwrap_or(0)))
}
