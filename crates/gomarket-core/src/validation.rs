//! # Validation Module
//!
//! Checks applied to every item that enters the cart.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Ways Into The Cart                             │
//! │                                                                         │
//! │  UI: add_item(item)                  Storage: Cart::from_snapshot(json) │
//! │       │                                       │                         │
//! │       ▼                                       ▼                         │
//! │  validate_new_item()                 serde (fields, types)              │
//! │  └── price finite                         │                             │
//! │       │                                   ▼                             │
//! │       │                              validate_stored_item()             │
//! │       │                              ├── price finite                   │
//! │       │                              └── quantity >= 1                  │
//! │       ▼                                       │                         │
//! │  quantity forced to 1                         ▼                         │
//! │                                      duplicate id check (cart.rs)       │
//! │                                                                         │
//! │  Blank ids and negative prices (gift lines, discounts) are accepted.   │
//! │  Only values that would not survive a write and read back are not:     │
//! │  serde_json writes NaN and infinities as `null`.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CartItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be a finite number; zero and negative prices are allowed
///
/// ## Example
/// ```rust
/// use gomarket_core::validation::validate_price;
///
/// assert!(validate_price(-5.0).is_ok());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}

/// Validates a stored quantity. Zero never appears in a cart.
pub fn validate_quantity(quantity: u32) -> ValidationResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Item Validators
// =============================================================================

/// Validates an item handed to `add_item`. Its quantity is ignored.
pub fn validate_new_item(item: &CartItem) -> ValidationResult<()> {
    validate_price(item.price)
}

/// Validates an item read back from a snapshot.
pub fn validate_stored_item(item: &CartItem) -> ValidationResult<()> {
    validate_new_item(item)?;
    validate_quantity(item.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(10.99).is_ok());
        assert!(validate_price(-5.0).is_ok());
        assert!(validate_price(1e17).is_ok());

        assert!(matches!(
            validate_price(f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_new_item_ignores_quantity() {
        let mut item = CartItem::new("1", "Shirt", "u", 10.0);
        item.quantity = 0;
        assert!(validate_new_item(&item).is_ok());
        assert!(validate_stored_item(&item).is_err());
    }

    #[test]
    fn test_stored_item() {
        let item = CartItem::new("1", "Shirt", "u", 10.0);
        assert!(validate_stored_item(&item).is_ok());

        let blank = CartItem::new("", "Gift card", "u", 10.0);
        assert!(validate_stored_item(&blank).is_ok());

        let discount = CartItem::new("d", "Discount", "u", -5.0);
        assert!(validate_stored_item(&discount).is_ok());

        let mut zero = CartItem::new("1", "Shirt", "u", 10.0);
        zero.quantity = 0;
        assert_eq!(
            validate_stored_item(&zero),
            Err(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
    }
}
