//! # Error Types
//!
//! Domain-specific error types for vela-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vela-core errors (this file)                                          │
//! │  ├── CoreError        - Discount/quantity rule violations              │
//! │  └── ValidationError  - Field-level validation failures                │
//! │                                                                         │
//! │  vela-sales errors (separate crate)                                    │
//! │  ├── RepositoryError  - Storage collaborator failures                  │
//! │  └── SalesError       - What command-service callers see               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SalesError → Caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (quantity, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
///
/// These represent violations of the discount-tier rules. They are fatal to
/// the command in flight: an aggregate is never persisted in a state that
/// produced one of these.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity is outside the hard sale-line range [1, 20].
    ///
    /// ## When This Occurs
    /// - A caller requests more than 20 units of one product
    /// - Zero or negative quantity reaches the aggregate
    #[error("Invalid quantity {quantity}: must be between {min} and {max}", min = crate::MIN_ITEM_QUANTITY, max = crate::MAX_ITEM_QUANTITY)]
    InvalidQuantity { quantity: i64 },

    /// A non-zero discount was applied to a quantity below the first tier.
    ///
    /// Quantities 1-3 must never carry a discount.
    #[error("Quantity {quantity} does not qualify for a discount (got {discount}%)")]
    DiscountNotAllowed { quantity: i64, discount: u32 },

    /// A stored discount percentage diverges from the tier its quantity
    /// implies. Catches drift between stored and derivable values.
    #[error("Discount {actual}% does not match the {expected}% tier for quantity {quantity}")]
    DiscountMismatch {
        quantity: i64,
        expected: u32,
        actual: u32,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level validation errors.
///
/// These occur when input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date that must not lie in the future does.
    #[error("{field} must not be in the future")]
    InFuture { field: String },

    /// Two dates are in the wrong order (e.g. cancelled before created).
    #[error("{field} must be after {other}")]
    OutOfOrder { field: String, other: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { quantity: 25 };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 25: must be between 1 and 20"
        );

        let err = CoreError::DiscountMismatch {
            quantity: 5,
            expected: 10,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "Discount 0% does not match the 10% tier for quantity 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "branch_id".to_string(),
        };
        assert_eq!(err.to_string(), "branch_id is required");

        let err = ValidationError::InFuture {
            field: "sale_date".to_string(),
        };
        assert_eq!(err.to_string(), "sale_date must not be in the future");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
