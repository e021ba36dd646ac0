//! # Storage Error Types
//!
//! ```text
//! sqlx::Error / MigrateError
//!       │
//!       ▼
//! DbError ──► CartError::Storage         (boot: opening the database)
//!       └───► warn! log in CartService   (a snapshot read or write)
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory missing or not writable
    /// - Disk full
    #[error("Failed to open storage: {0}")]
    Open(String),

    /// Embedded migrations could not be applied.
    #[error("Storage migration failed: {0}")]
    Migration(String),

    /// A statement was rejected by SQLite.
    #[error("Storage query failed: {0}")]
    Query(String),

    /// No connection became free in time, or SQLite reported the file locked.
    #[error("Storage is busy")]
    Busy,

    /// The pool was closed by `Database::close`.
    #[error("Storage is closed")]
    Closed,

    /// Anything else sqlx reports.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// ## Error Mapping
/// ```text
/// Database error, SQLITE_BUSY / SQLITE_LOCKED  → Busy (extended codes too)
/// Database error, anything else                → Query
/// PoolTimedOut                                 → Busy
/// PoolClosed                                   → Closed
/// Io                                           → Open
/// Other                                        → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) if is_busy_code(&code) => DbError::Busy,
                _ => DbError::Query(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Closed,
            sqlx::Error::Io(io_err) => DbError::Open(io_err.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

/// SQLITE_BUSY (5) or SQLITE_LOCKED (6), including extended codes such as
/// SQLITE_BUSY_SNAPSHOT (517). The primary code is the low byte.
fn is_busy_code(code: &str) -> bool {
    matches!(code.parse::<i64>().map(|c| c & 0xff), Ok(5) | Ok(6))
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;
