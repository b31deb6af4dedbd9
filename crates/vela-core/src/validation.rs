//! # Validation Module
//!
//! Field-level validation for Vela OMS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Command shape (vela-sales::commands)                         │
//! │  ├── THIS MODULE: field checks on raw input                            │
//! │  └── Rejected before the aggregate is ever touched                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Aggregate methods (vela-sales::sale)                         │
//! │  └── Invariant-preserving mutations, typed CoreError on violation      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Rule set (vela-sales::rules)                                 │
//! │  └── Collected violations over the whole aggregate before persistence  │
//! │                                                                         │
//! │  Defense in depth: each layer catches what the one above missed        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vela_core::validation::{validate_quantity, validate_unit_price};
//!
//! validate_quantity(5).unwrap();
//! validate_unit_price(10_000).unwrap();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_NUMBER_LEN, MIN_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Violation
// =============================================================================

/// A single collected validation failure: which field, what went wrong.
///
/// Rule sets collect these instead of short-circuiting so a caller sees
/// every problem with their input at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `items[2].quantity`.
    pub field: String,

    /// Human-readable description of the failure.
    pub message: String,
}

impl Violation {
    /// Creates a violation for a field from a typed validation error.
    pub fn new(field: impl Into<String>, error: &ValidationError) -> Self {
        Violation {
            field: field.into(),
            message: error.to_string(),
        }
    }

    /// Creates a violation with a free-form message.
    pub fn message(field: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a human-readable sale number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
pub fn validate_sale_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "number".to_string(),
        });
    }

    if number.len() > MAX_SALE_NUMBER_LEN {
        return Err(ValidationError::TooLong {
            field: "number".to_string(),
            max: MAX_SALE_NUMBER_LEN,
        });
    }

    Ok(())
}

/// Validates a UUID string used as an entity reference.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a UUID
///
/// ## Example
/// ```rust
/// use vela_core::validation::validate_reference;
///
/// assert!(validate_reference("branch_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_reference("branch_id", "not-a-uuid").is_err());
/// ```
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity.
///
/// ## Rules
/// - Must be within the hard range [1, 20]
///
/// 20 is a sale-line cap: anything above it is rejected outright, never
/// clamped or warned about.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be strictly positive; free items do not exist in this domain
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates that a sale date does not lie in the future.
pub fn validate_sale_date(sale_date: DateTime<Utc>) -> ValidationResult<()> {
    if sale_date > Utc::now() {
        return Err(ValidationError::InFuture {
            field: "sale_date".to_string(),
        });
    }

    Ok(())
}

/// Validates cancellation-date ordering: when set, the cancellation instant
/// must fall strictly after creation.
pub fn validate_cancelled_after_created(
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
) -> ValidationResult<()> {
    match cancelled_at {
        Some(at) if at <= created_at => Err(ValidationError::OutOfOrder {
            field: "cancelled_at".to_string(),
            other: "created_at".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_sale_number() {
        assert!(validate_sale_number("20260825-0001").is_ok());
        assert!(validate_sale_number("").is_err());
        assert!(validate_sale_number("   ").is_err());
        assert!(validate_sale_number(&"A".repeat(60)).is_err());
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("branch_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_reference("branch_id", "").is_err());
        assert!(validate_reference("branch_id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(20).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(21).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(1).is_ok());
        assert!(validate_unit_price(10_000).is_ok());
        assert!(validate_unit_price(0).is_err());
        assert!(validate_unit_price(-100).is_err());
    }

    #[test]
    fn test_validate_sale_date() {
        assert!(validate_sale_date(Utc::now() - Duration::hours(1)).is_ok());
        assert!(validate_sale_date(Utc::now() + Duration::hours(1)).is_err());
    }

    #[test]
    fn test_validate_cancelled_after_created() {
        let created = Utc::now();

        assert!(validate_cancelled_after_created(None, created).is_ok());
        assert!(
            validate_cancelled_after_created(Some(created + Duration::seconds(1)), created).is_ok()
        );
        assert!(validate_cancelled_after_created(Some(created), created).is_err());
        assert!(
            validate_cancelled_after_created(Some(created - Duration::seconds(1)), created)
                .is_err()
        );
    }

    #[test]
    fn test_violation_from_error() {
        let err = ValidationError::Required {
            field: "customer_id".to_string(),
        };
        let v = Violation::new("customer_id", &err);
        assert_eq!(v.field, "customer_id");
        assert_eq!(v.message, "customer_id is required");
    }
}
