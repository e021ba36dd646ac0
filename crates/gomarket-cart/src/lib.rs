//! # gomarket-cart: The GoMarketplace Cart Store
//!
//! Runs the shopping cart for the storefront app: adds products, adjusts
//! quantities, and keeps the cart in device storage across restarts.
//!
//! ## Module Organization
//! ```text
//! gomarket_cart/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── app.rs          ◄─── boot(), App, init_tracing()
//! ├── service.rs      ◄─── CartService task + CartHandle
//! ├── provider.rs     ◄─── CartProvider scope, use_cart()
//! ├── config.rs       ◄─── CartConfig (defaults, cart.toml, env)
//! └── error.rs        ◄─── CartError
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use gomarket_cart::{boot, init_tracing, CartConfig};
//! use gomarket_core::CartItem;
//!
//! init_tracing();
//! let app = boot(CartConfig::load(None)?).await?;
//!
//! let cart = app.cart().clone();
//! cart.add_to_cart(CartItem::new("1", "Shirt", "https://cdn/shirt.png", 10.0)).await?;
//! cart.increment("1").await?;
//! println!("{}", cart.totals().subtotal); // $20.00
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod provider;
pub mod service;

#[cfg(test)]
mod testing;

pub use app::{boot, init_tracing, App, DEFAULT_LOG_FILTER};
pub use config::{CartConfig, ConfigError, HydratePolicy};
pub use error::{CartError, CartResult};
pub use provider::{use_cart, CartProvider};
pub use service::{CartCommand, CartHandle, CartReply, CartService, HydrationStatus};
