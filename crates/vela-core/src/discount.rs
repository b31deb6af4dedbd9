//! # Discount Policy
//!
//! The single source of truth for quantity-tier discounts.
//!
//! ## The Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quantity-Tier Discount Policy                       │
//! │                                                                         │
//! │  quantity < 1 or > 20 ──► InvalidQuantity (hard cap, not a warning)    │
//! │                                                                         │
//! │   1 ..= 3  ──►  0%   (a discount here is forbidden, not just absent)   │
//! │   4 ..= 9  ──► 10%   (mandatory, not optional)                         │
//! │  10 ..= 20 ──► 20%   (mandatory, not optional)                         │
//! │                                                                         │
//! │  No other tiers exist. No code path may set a discount percentage      │
//! │  except through this module.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deterministic and side-effect-free: same quantity in, same tier out.

use crate::error::{CoreError, CoreResult};
use crate::types::DiscountTier;
use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

/// Maps an item quantity to its discount tier.
///
/// ## Errors
/// `InvalidQuantity` when the quantity is outside `[1, 20]`.
///
/// ## Example
/// ```rust
/// use vela_core::discount::discount_for;
/// use vela_core::types::DiscountTier;
///
/// assert_eq!(discount_for(2).unwrap(), DiscountTier::None);
/// assert_eq!(discount_for(5).unwrap(), DiscountTier::Ten);
/// assert_eq!(discount_for(15).unwrap(), DiscountTier::Twenty);
/// assert!(discount_for(25).is_err());
/// ```
pub fn discount_for(quantity: i64) -> CoreResult<DiscountTier> {
    if !(MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(CoreError::InvalidQuantity { quantity });
    }

    let tier = match quantity {
        1..=3 => DiscountTier::None,
        4..=9 => DiscountTier::Ten,
        _ => DiscountTier::Twenty,
    };

    Ok(tier)
}

/// Checks a stored discount percentage against the tier its quantity implies.
///
/// Used as a drift detector: an item whose stored percentage no longer
/// matches what [`discount_for`] would produce was mutated outside the
/// aggregate API.
///
/// ## Errors
/// - `InvalidQuantity` when the quantity is outside `[1, 20]`
/// - `DiscountNotAllowed` when a below-tier quantity carries any discount
/// - `DiscountMismatch` for any other divergence
pub fn check_tier(quantity: i64, discount_percent: u32) -> CoreResult<()> {
    let expected = discount_for(quantity)?.percent();

    if expected == discount_percent {
        return Ok(());
    }

    if expected == 0 && discount_percent > 0 {
        return Err(CoreError::DiscountNotAllowed {
            quantity,
            discount: discount_percent,
        });
    }

    Err(CoreError::DiscountMismatch {
        quantity,
        expected,
        actual: discount_percent,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_discount_tier() {
        for q in 1..=3 {
            assert_eq!(discount_for(q).unwrap(), DiscountTier::None, "qty {}", q);
        }
    }

    #[test]
    fn test_ten_percent_tier() {
        for q in 4..=9 {
            assert_eq!(discount_for(q).unwrap(), DiscountTier::Ten, "qty {}", q);
        }
    }

    #[test]
    fn test_twenty_percent_tier() {
        for q in 10..=20 {
            assert_eq!(discount_for(q).unwrap(), DiscountTier::Twenty, "qty {}", q);
        }
    }

    #[test]
    fn test_out_of_range_quantities() {
        assert!(matches!(
            discount_for(0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            discount_for(-3),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            discount_for(21),
            Err(CoreError::InvalidQuantity { quantity: 21 })
        ));
        assert!(matches!(
            discount_for(25),
            Err(CoreError::InvalidQuantity { quantity: 25 })
        ));
    }

    #[test]
    fn test_check_tier_accepts_matching() {
        assert!(check_tier(2, 0).is_ok());
        assert!(check_tier(5, 10).is_ok());
        assert!(check_tier(20, 20).is_ok());
    }

    #[test]
    fn test_check_tier_rejects_discount_below_first_tier() {
        assert!(matches!(
            check_tier(3, 10),
            Err(CoreError::DiscountNotAllowed {
                quantity: 3,
                discount: 10
            })
        ));
    }

    #[test]
    fn test_check_tier_rejects_drift() {
        assert!(matches!(
            check_tier(5, 0),
            Err(CoreError::DiscountMismatch {
                quantity: 5,
                expected: 10,
                actual: 0
            })
        ));
        assert!(matches!(
            check_tier(12, 10),
            Err(CoreError::DiscountMismatch {
                quantity: 12,
                expected: 20,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_check_tier_propagates_invalid_quantity() {
        assert!(matches!(
            check_tier(21, 20),
            Err(CoreError::InvalidQuantity { .. })
        ));
    }
}
