//! # gomarket-core: Pure Cart Logic for the GoMarketplace Storefront
//!
//! This crate holds every cart rule as plain data and functions with zero I/O.
//! Persistence lives in `gomarket-db`; the running store lives in
//! `gomarket-cart`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     GoMarketplace Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (product list, cart)               │   │
//! │  │    "Add" button ──► "+" / "-" buttons ──► cart total            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartHandle                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gomarket-cart (CartService task)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gomarket-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   money   │  │ validation│  │   │
//! │  │   │ CartItem  │  │   Cart    │  │   Money   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             gomarket-db (key-value device storage)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `CartItem`, the unit stored in the cart
//! - [`cart`] - `Cart` with add/increment/decrement and the snapshot codec
//! - [`money`] - Integer-cents `Money` for cart totals
//! - [`validation`] - Checks applied to items entering the cart
//! - [`error`] - Validation and snapshot error types
//!
//! ## Example Usage
//!
//! ```rust
//! use gomarket_core::{Cart, CartItem};
//!
//! let mut cart = Cart::new();
//! let shirt = CartItem::new("1", "Shirt", "https://cdn.example/shirt.png", 10.0);
//!
//! cart.add_item(shirt.clone()).unwrap();
//! cart.add_item(shirt).unwrap();
//! assert_eq!(cart.get("1").map(|i| i.quantity), Some(2));
//!
//! let snapshot = cart.to_snapshot().unwrap();
//! let restored = Cart::from_snapshot(&snapshot).unwrap();
//! assert_eq!(restored, cart);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartChange, CartTotals};
pub use error::{SnapshotError, SnapshotResult, ValidationError};
pub use money::Money;
pub use types::CartItem;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key the cart snapshot lives under.
///
/// The `@App:` prefix namespaces the slot so other features sharing the same
/// device storage cannot collide with it.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";
