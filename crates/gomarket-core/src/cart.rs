//! # Cart
//!
//! The ordered, id-unique list of items, and the three ways to change it.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation          Item present?        Result                         │
//! │  ─────────          ─────────────        ──────                         │
//! │                                                                         │
//! │  add_item(item)     yes                  quantity += 1                  │
//! │                     no                   push item with quantity = 1    │
//! │                                                                         │
//! │  increment(id)      yes                  quantity += 1                  │
//! │                     no                   Unchanged                      │
//! │                                                                         │
//! │  decrement(id)      yes, quantity > 1    quantity -= 1                  │
//! │                     yes, quantity == 1   item removed                   │
//! │                     no                   Unchanged                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `id`
//! - Every quantity is >= 1
//! - Order is the order items were first added
//!
//! The item list is private so these hold for every `Cart` value, including
//! ones decoded from storage.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{SnapshotError, SnapshotResult};
use crate::money::Money;
use crate::types::CartItem;
use crate::validation::{validate_new_item, validate_stored_item, ValidationResult};

// =============================================================================
// Cart Change
// =============================================================================

/// What a cart operation did.
///
/// The store uses this to decide whether a write to storage is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added { id: String },
    /// An existing line's quantity moved to `quantity`.
    QuantityChanged { id: String, quantity: u32 },
    /// A line was removed.
    Removed { id: String },
    /// No line matched; the cart is untouched.
    Unchanged,
}

impl CartChange {
    /// Returns true if the operation modified the cart.
    pub fn is_changed(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Serializes as a bare JSON array of [`CartItem`], which is also the
/// snapshot format kept in device storage. Decoding goes through
/// [`Cart::from_snapshot`] only, which validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product, or bumps its quantity if the id is already present.
    ///
    /// ## Behavior
    /// - Present: quantity += 1; title, image and price stay as first added
    /// - Absent: appended with quantity 1, whatever `item.quantity` says
    ///
    /// ## Errors
    /// A price that is not a finite number (it would not survive the
    /// snapshot). Blank ids and negative prices are accepted.
    pub fn add_item(&mut self, item: CartItem) -> ValidationResult<CartChange> {
        validate_new_item(&item)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return Ok(CartChange::QuantityChanged {
                id: item.id,
                quantity: existing.quantity,
            });
        }

        let id = item.id.clone();
        self.items.push(CartItem { quantity: 1, ..item });
        Ok(CartChange::Added { id })
    }

    /// Increases the quantity of `id` by one.
    pub fn increment(&mut self, id: &str) -> CartChange {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                CartChange::QuantityChanged {
                    id: id.to_string(),
                    quantity: item.quantity,
                }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Decreases the quantity of `id` by one, removing the line at zero.
    pub fn decrement(&mut self, id: &str) -> CartChange {
        let Some(index) = self.items.iter().position(|i| i.id == id) else {
            return CartChange::Unchanged;
        };

        let quantity = self.items[index].quantity;
        if quantity > 1 {
            self.items[index].quantity = quantity - 1;
            CartChange::QuantityChanged {
                id: id.to_string(),
                quantity: quantity - 1,
            }
        } else {
            // remove (not swap_remove): insertion order is part of the contract
            self.items.remove(index);
            CartChange::Removed { id: id.to_string() }
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the item with `id`, if any.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Summary for the cart screen footer.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    // =========================================================================
    // Snapshot Codec
    // =========================================================================

    /// Serializes the cart into the stored snapshot format.
    pub fn to_snapshot(&self) -> SnapshotResult<String> {
        serde_json::to_string(&self.items).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Parses and validates a stored snapshot.
    ///
    /// ## Checks
    /// ```text
    /// JSON array? ── no ──► Malformed
    ///     │
    /// every item has id, title, image_url, price, quantity? ── no ──► Malformed
    ///     │
    /// id not blank, price finite >= 0, quantity >= 1? ── no ──► InvalidItem
    ///     │
    /// ids unique? ── no ──► DuplicateId
    ///     │
    ///     ▼
    ///   Cart
    /// ```
    pub fn from_snapshot(snapshot: &str) -> SnapshotResult<Self> {
        let items: Vec<CartItem> = serde_json::from_str(snapshot)?;

        let mut seen = HashSet::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            validate_stored_item(item)
                .map_err(|source| SnapshotError::InvalidItem { index, source })?;

            if !seen.insert(item.id.as_str()) {
                return Err(SnapshotError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Cart { items })
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    /// Distinct lines.
    pub item_count: usize,
    /// Sum of quantities ("3 items" badge).
    pub total_quantity: u64,
    /// Sum of unit price × quantity, in cents.
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
