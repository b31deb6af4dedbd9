//! # vela-core: Pure Business Logic for Vela OMS
//!
//! This crate is the **heart** of Vela OMS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vela OMS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host application                             │   │
//! │  │    HTTP routing, persistence, auth (out of scope here)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vela-sales                                   │   │
//! │  │    Sale aggregate, validation rules, command service           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vela-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │ discount  │  │   types   │  │ validation│  │   │
//! │  │   │   Money   │  │  tiers    │  │AuditFields│  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`discount`] - Quantity-tier discount policy
//! - [`types`] - Shared domain types (AuditFields, DiscountTier)
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use vela_core::money::Money;
//! use vela_core::discount::discount_for;
//!
//! // Quantity 5 sits in the 10% tier
//! let tier = discount_for(5).unwrap();
//! assert_eq!(tier.percent(), 10);
//!
//! // Item maths stays in integer cents
//! let subtotal = Money::from_cents(10_000).multiply_quantity(5); // 5 × $100.00
//! let discount = subtotal.percentage(tier.percent());
//! assert_eq!((subtotal - discount).cents(), 45_000); // $450.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vela_core::Money` instead of
// `use vela_core::money::Money`

pub use discount::{check_tier, discount_for};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::{AuditFields, DiscountTier};
pub use validation::Violation;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity for a single sale line.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity for a single sale line.
///
/// ## Business Reason
/// 20 is a hard sale-line cap, not a soft validation hint. A quantity above
/// it never reaches the aggregate; it is rejected as invalid input.
pub const MAX_ITEM_QUANTITY: i64 = 20;

/// Maximum length of a human-readable sale number.
pub const MAX_SALE_NUMBER_LEN: usize = 50;
