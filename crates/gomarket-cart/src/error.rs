//! # Cart Error Type
//!
//! What callers of the cart store see.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Each Failure Ends Up                           │
//! │                                                                         │
//! │  use_cart() outside a provider ───────────────► CartError::NoProvider  │
//! │                                                                         │
//! │  add_to_cart(item with NaN price) ────────────► CartError::Validation  │
//! │                                                                         │
//! │  snapshot write fails after a mutation ───────► warn! log only;        │
//! │                                                  caller gets Ok(cart)   │
//! │                                                                         │
//! │  snapshot unreadable at start                                          │
//! │     ├── policy fallback_to_empty ─────────────► warn! log, empty cart  │
//! │     └── policy strict ────────────────────────► CartError::            │
//! │                                                  HydrationFailed on     │
//! │                                                  every mutation         │
//! │                                                                         │
//! │  service task gone ───────────────────────────► CartError::ServiceClosed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use gomarket_core::ValidationError;
use gomarket_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Cart store errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// A consumer asked for the cart outside any provider scope.
    #[error("use_cart must be used within a CartProvider")]
    NoProvider,

    /// The service task has stopped; commands can no longer be applied.
    #[error("Cart service is not running")]
    ServiceClosed,

    /// Strict hydrate policy and the saved snapshot could not be restored.
    #[error("Saved cart could not be restored: {0}")]
    HydrationFailed(String),

    /// The item handed to `add_to_cart` breaks a cart rule.
    #[error("Invalid cart item: {0}")]
    Validation(#[from] ValidationError),

    /// Storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;
