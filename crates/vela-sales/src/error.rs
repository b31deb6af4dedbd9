//! # Sales Errors
//!
//! The error surface that command-service callers see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vela_core::ValidationError ──► vela_core::CoreError ──┐                │
//! │                                                         ▼                │
//! │  RepositoryError ──────────────────────────────► SalesError ──► Caller  │
//! │                                                         ▲                │
//! │  Rule-set violations (collected) ───────────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lifecycle conflicts (`AlreadyCancelled`, `CannotModifyCancelledSale`) are
//! their own variants rather than validation failures: they describe the
//! state of the aggregate, not the shape of the input.

use thiserror::Error;

use vela_core::{CoreError, Violation};

use crate::repository::RepositoryError;

/// Result type for sales operations.
pub type SalesResult<T> = Result<T, SalesError>;

/// Errors produced by the sale command service.
#[derive(Debug, Error)]
pub enum SalesError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The sale or item is already cancelled; cancelling twice is a
    /// caller error, not a silent no-op.
    #[error("{entity} {id} is already cancelled")]
    AlreadyCancelled { entity: &'static str, id: String },

    /// Mutating commands are rejected once a sale is cancelled.
    #[error("Sale {id} is cancelled and cannot be modified")]
    CannotModifyCancelledSale { id: String },

    /// One or more collected field/rule violations.
    #[error("Validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    /// Business rule violation from the core policy.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage collaborator failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SalesError {
    /// A sale that does not exist in the repository.
    pub fn sale_not_found(id: impl Into<String>) -> Self {
        SalesError::NotFound {
            entity: "Sale",
            id: id.into(),
        }
    }

    /// A sale item that does not exist on the loaded sale.
    pub fn item_not_found(id: impl Into<String>) -> Self {
        SalesError::NotFound {
            entity: "Sale item",
            id: id.into(),
        }
    }

    /// A product the catalog cannot price.
    pub fn product_not_found(id: impl Into<String>) -> Self {
        SalesError::NotFound {
            entity: "Product",
            id: id.into(),
        }
    }

    /// A sale that is already cancelled.
    pub fn sale_already_cancelled(id: impl Into<String>) -> Self {
        SalesError::AlreadyCancelled {
            entity: "Sale",
            id: id.into(),
        }
    }

    /// A sale item that is already cancelled.
    pub fn item_already_cancelled(id: impl Into<String>) -> Self {
        SalesError::AlreadyCancelled {
            entity: "Sale item",
            id: id.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SalesError::sale_not_found("abc-123");
        assert_eq!(err.to_string(), "Sale not found: abc-123");

        let err = SalesError::item_already_cancelled("item-9");
        assert_eq!(err.to_string(), "Sale item item-9 is already cancelled");

        let err = SalesError::CannotModifyCancelledSale {
            id: "abc-123".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sale abc-123 is cancelled and cannot be modified"
        );
    }

    #[test]
    fn test_validation_message_counts_violations() {
        let err = SalesError::Validation(vec![
            Violation::message("items", "at least one item is required"),
            Violation::message("branch_id", "branch_id is required"),
        ]);
        assert_eq!(err.to_string(), "Validation failed with 2 violation(s)");
    }

    #[test]
    fn test_core_error_converts() {
        let core = CoreError::InvalidQuantity { quantity: 25 };
        let err: SalesError = core.into();
        assert!(matches!(err, SalesError::Core(_)));
    }
}
