//! # Read Projections
//!
//! Serializable views returned by the command service.
//!
//! Views are flat snapshots: money as integer cents, identifiers as strings,
//! no behavior. Callers render and localize themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sale::{Sale, SaleItem};

/// Snapshot of one sale line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemView {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub discount_percent: u32,
    pub subtotal: i64,
    pub discount_amount: i64,
    pub total: i64,
    pub is_cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<&SaleItem> for SaleItemView {
    fn from(item: &SaleItem) -> Self {
        SaleItemView {
            id: item.id().to_string(),
            product_id: item.product_id().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price().cents(),
            discount_percent: item.discount_percent(),
            subtotal: item.subtotal().cents(),
            discount_amount: item.discount_amount().cents(),
            total: item.total().cents(),
            is_cancelled: item.is_cancelled(),
            cancelled_at: item.cancelled_at(),
        }
    }
}

/// Snapshot of a whole sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: String,
    pub number: String,
    pub branch_id: String,
    pub customer_id: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItemView>,
    pub subtotal: i64,
    pub discount_total: i64,
    pub total_amount: i64,
    pub is_cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Sale> for SaleView {
    fn from(sale: &Sale) -> Self {
        SaleView {
            id: sale.id().to_string(),
            number: sale.number().to_string(),
            branch_id: sale.branch_id().to_string(),
            customer_id: sale.customer_id().to_string(),
            sale_date: sale.sale_date(),
            items: sale.items().iter().map(SaleItemView::from).collect(),
            subtotal: sale.subtotal().cents(),
            discount_total: sale.discount_total().cents(),
            total_amount: sale.total_amount().cents(),
            is_cancelled: sale.is_cancelled(),
            cancelled_at: sale.cancelled_at(),
            created_at: sale.audit().created_at,
            updated_at: sale.audit().updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vela_core::Money;

    #[test]
    fn test_view_mirrors_sale() {
        let mut sale = Sale::new(
            "20260825-0001",
            "550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440001",
            Utc::now(),
        );
        sale.add_item(
            "550e8400-e29b-41d4-a716-446655440002",
            5,
            Money::from_cents(10_000),
        )
        .unwrap();

        let view = SaleView::from(&sale);
        assert_eq!(view.number, "20260825-0001");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].discount_percent, 10);
        assert_eq!(view.items[0].total, 45_000);
        assert_eq!(view.total_amount, 45_000);
        assert!(!view.is_cancelled);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let sale = Sale::new(
            "20260825-0001",
            "550e8400-e29b-41d4-a716-446655440000",
            "550e8400-e29b-41d4-a716-446655440001",
            Utc::now(),
        );
        let json = serde_json::to_value(SaleView::from(&sale)).unwrap();

        assert!(json.get("totalAmount").is_some());
        assert!(json.get("branchId").is_some());
        // None cancelled_at is omitted entirely
        assert!(json.get("cancelledAt").is_none());
    }
}
