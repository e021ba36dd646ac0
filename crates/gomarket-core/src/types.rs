//! # Domain Types
//!
//! The cart line item, exactly as the storefront catalog hands it over and
//! exactly as it is written to device storage.
//!
//! ## Wire Shape
//! ```text
//! {
//!   "id": "1",
//!   "title": "Shirt",
//!   "image_url": "https://cdn.example/shirt.png",
//!   "price": 10,
//!   "quantity": 1
//! }
//! ```
//! Field names are part of the stored snapshot format. Do not rename them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cart Item
// =============================================================================

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Catalog id; unique within a cart.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Product image shown next to the line.
    pub image_url: String,

    /// Unit price in major currency units, as sent by the catalog.
    pub price: f64,

    /// Units of this product in the cart. Always >= 1 inside a `Cart`.
    pub quantity: u32,
}

impl CartItem {
    /// Creates an item with quantity 1.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        CartItem {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
            quantity: 1,
        }
    }

    /// Unit price in cents.
    ///
    /// Saturates at the `i64` cent bounds, so a price too large for cents
    /// still dominates the total instead of vanishing from it.
    pub fn unit_price(&self) -> Money {
        Money::saturating_from_price(self.price)
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}
