//! # Domain Types
//!
//! Core domain types shared across Vela OMS.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 string - immutable, used for references between entities
//! - Business ID where one exists (sale number) - human-readable
//!
//! Entities embed [`AuditFields`] by composition rather than inheriting from
//! a shared base entity; there is no type hierarchy to fight.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Discount Tier
// =============================================================================

/// A quantity-tier discount expressed as a whole percentage.
///
/// ## The Tier Table
/// ```text
/// ┌──────────────┬────────────┐
/// │  quantity    │  discount  │
/// ├──────────────┼────────────┤
/// │  1 ..= 3     │    0%      │
/// │  4 ..= 9     │   10%      │
/// │ 10 ..= 20    │   20%      │
/// └──────────────┴────────────┘
/// ```
/// No other tiers exist. The mapping lives in [`crate::discount`]; this type
/// only names the three legal values so an illegal percentage cannot be
/// represented once it has passed the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    /// 1-3 units: no discount allowed.
    None,
    /// 4-9 units: mandatory 10% discount.
    Ten,
    /// 10-20 units: mandatory 20% discount.
    Twenty,
}

impl DiscountTier {
    /// Returns the tier as a whole percentage (0, 10 or 20).
    #[inline]
    pub const fn percent(&self) -> u32 {
        match self {
            DiscountTier::None => 0,
            DiscountTier::Ten => 10,
            DiscountTier::Twenty => 20,
        }
    }
}

// =============================================================================
// Audit Fields
// =============================================================================

/// Creation/modification timestamps embedded in each entity.
///
/// Replaces base-entity inheritance with composition: entities own an
/// `AuditFields` value instead of extending a common superclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    /// When the entity was created.
    pub created_at: DateTime<Utc>,

    /// When the entity was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AuditFields {
    /// Creates audit fields stamped with the current instant.
    pub fn now() -> Self {
        let now = Utc::now();
        AuditFields {
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the entity as updated at the current instant.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        AuditFields::now()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_percentages() {
        assert_eq!(DiscountTier::None.percent(), 0);
        assert_eq!(DiscountTier::Ten.percent(), 10);
        assert_eq!(DiscountTier::Twenty.percent(), 20);
    }

    #[test]
    fn test_audit_fields_touch() {
        let mut audit = AuditFields::now();
        let created = audit.created_at;
        audit.touch();
        assert_eq!(audit.created_at, created);
        assert!(audit.updated_at >= created);
    }
}
