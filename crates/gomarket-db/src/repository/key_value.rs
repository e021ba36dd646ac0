//! # Key-Value Repository
//!
//! SQLite-backed [`KeyValueStorage`].
//!
//! ## Write Path
//! ```text
//! set_item("@GoMarketplace:products", "[...]")
//!      │
//!      ▼
//! INSERT INTO key_value_store (key, value) VALUES (?1, ?2)
//! ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = now
//!      │
//!      ▼
//! One row per key; the whole snapshot is replaced in a single statement.
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::storage::KeyValueStorage;

/// Repository for key-value slots.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Lists stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM key_value_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStorage for KeyValueRepository {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM key_value_store WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        debug!(key = %key, found = value.is_some(), "get_item");
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "set_item");

        sqlx::query(
            r#"
            INSERT INTO key_value_store (key, value, updated_at)
            VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> DbResult<()> {
        debug!(key = %key, "remove_item");

        sqlx::query("DELETE FROM key_value_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.key_values().get_item("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.key_values();

        repo.set_item("@GoMarketplace:products", "[]").await.unwrap();
        repo.set_item("@GoMarketplace:products", r#"[{"id":"1"}]"#)
            .await
            .unwrap();

        assert_eq!(
            repo.get_item("@GoMarketplace:products").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
        assert_eq!(repo.keys().await.unwrap(), vec!["@GoMarketplace:products"]);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.key_values();

        repo.set_item("a", "1").await.unwrap();
        repo.set_item("b", "2").await.unwrap();
        repo.remove_item("a").await.unwrap();
        repo.remove_item("missing").await.unwrap();

        assert_eq!(repo.keys().await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.key_values().set_item("k", "persisted").await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.key_values().get_item("k").await.unwrap().as_deref(),
            Some("persisted")
        );
    }
}
