//! # gomarket-db: Device Storage for the GoMarketplace Cart
//!
//! This crate provides the persistent key-value storage the cart snapshot is
//! written to. It mirrors the read-by-key / write-key-value contract of a
//! mobile async storage module, backed by SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Persistence Flow                            │
//! │                                                                         │
//! │  CartService (gomarket-cart)                                           │
//! │       │  storage.set_item("@GoMarketplace:products", "[...]")          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gomarket-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │ KeyValueStorage │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │    (trait)      │   │  (embedded)  │  │   │
//! │  │   │               │    │   ▲        ▲    │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ KeyValue  Memory│   │ 001_kv.sql   │  │   │
//! │  │   │               │    │ Repository Stor.│   │              │  │   │
//! │  │   └───────────────┘    └─────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite file in the app data dir (key_value_store table)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`storage`] - The `KeyValueStorage` trait and `MemoryStorage`
//! - [`repository`] - SQLite-backed `KeyValueRepository`
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gomarket_db::{Database, DbConfig, KeyValueStorage};
//!
//! let db = Database::new(DbConfig::new("path/to/storage.db")).await?;
//! let storage = db.key_values();
//!
//! storage.set_item("@GoMarketplace:products", "[]").await?;
//! let saved = storage.get_item("@GoMarketplace:products").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::key_value::KeyValueRepository;
pub use storage::{KeyValueStorage, MemoryStorage};
