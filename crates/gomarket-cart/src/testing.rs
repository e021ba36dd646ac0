//! Storage doubles for service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use gomarket_core::CartItem;
use gomarket_db::{DbError, DbResult, KeyValueStorage, MemoryStorage};

/// A 10.00 shirt with the given id.
pub fn shirt(id: &str) -> CartItem {
    CartItem::new(id, "Shirt", "u", 10.0)
}

/// Memory storage that counts `set_item` calls.
#[derive(Debug, Clone, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStorage for CountingStorage {
    async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> DbResult<()> {
        self.inner.remove_item(key).await
    }
}

/// Storage where every call fails.
#[derive(Debug, Clone, Default)]
pub struct FailingStorage;

impl FailingStorage {
    pub fn new() -> Self {
        FailingStorage
    }
}

#[async_trait]
impl KeyValueStorage for FailingStorage {
    async fn get_item(&self, _key: &str) -> DbResult<Option<String>> {
        Err(DbError::Query("disk unavailable".into()))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> DbResult<()> {
        Err(DbError::Query("disk unavailable".into()))
    }

    async fn remove_item(&self, _key: &str) -> DbResult<()> {
        Err(DbError::Query("disk unavailable".into()))
    }
}
