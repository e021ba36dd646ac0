//! # Error Types
//!
//! Domain-specific error types for gomarket-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gomarket-core errors (this file)                                      │
//! │  ├── ValidationError  - An item breaks a cart rule                     │
//! │  └── SnapshotError    - Stored snapshot cannot become a Cart           │
//! │                                                                         │
//! │  gomarket-db errors (separate crate)                                   │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  gomarket-cart errors                                                  │
//! │  └── CartError        - What the UI sees                               │
//! │                                                                         │
//! │  Flow: ValidationError → SnapshotError → CartError → UI                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for items entering the cart, either from the UI through
/// `add_item` or from storage through snapshot decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. NaN price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Snapshot Error
// =============================================================================

/// Errors turning a stored snapshot into a [`Cart`](crate::Cart) or back.
///
/// ## When This Occurs
/// ```text
/// storage.get_item("@GoMarketplace:products")
///      │
///      ▼
/// "[{\"id\":\"1\",\"title\":\"Shirt\"}]"   (price and quantity missing)
///      │
///      ▼
/// Cart::from_snapshot(..) ──► SnapshotError::Malformed
///      │
///      ▼
/// Hydrate policy decides: fall back to empty, or refuse to write
/// ```
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not valid JSON, not an array, or an item misses a field.
    #[error("Malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An item decoded but breaks a cart rule.
    #[error("Invalid item at position {index}: {source}")]
    InvalidItem {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Two entries share an id.
    #[error("Duplicate item id in snapshot: {0}")]
    DuplicateId(String),

    /// The cart could not be serialized.
    #[error("Failed to encode cart snapshot: {0}")]
    Encode(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with SnapshotError.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "price has invalid format: must be a finite number"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_snapshot_error_messages() {
        let err = SnapshotError::DuplicateId("42".to_string());
        assert_eq!(err.to_string(), "Duplicate item id in snapshot: 42");

        let err = SnapshotError::InvalidItem {
            index: 3,
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid item at position 3: quantity must be positive"
        );
    }

    #[test]
    fn test_json_error_converts_to_malformed() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err: SnapshotError = json_err.into();
        assert!(matches!(err, SnapshotError::Malformed(_)));
    }
}
