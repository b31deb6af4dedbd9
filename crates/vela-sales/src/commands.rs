//! # Commands
//!
//! Input shapes for the four sale use cases.
//!
//! Commands are plain data with a shape check. They carry identifiers and
//! requested quantities only; authoritative prices come from the product
//! catalog at execution time, never from the caller.
//!
//! Shape validation here is the first of three layers (see
//! `vela_core::validation`): it rejects malformed input before the service
//! touches storage or the aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vela_core::validation::{
    validate_quantity, validate_reference, validate_sale_date, validate_unit_price, Violation,
};

// =============================================================================
// Create Sale
// =============================================================================

/// Requests a new sale for a customer at a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSale {
    pub branch_id: String,
    pub customer_id: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<CreateSaleItem>,
}

/// One requested line on a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleItem {
    pub product_id: String,
    pub quantity: i64,
}

impl CreateSale {
    /// Shape check: identifiers parse, date not in the future, at least one
    /// item, every quantity in range.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Err(e) = validate_reference("branch_id", &self.branch_id) {
            violations.push(Violation::new("branch_id", &e));
        }
        if let Err(e) = validate_reference("customer_id", &self.customer_id) {
            violations.push(Violation::new("customer_id", &e));
        }
        if let Err(e) = validate_sale_date(self.sale_date) {
            violations.push(Violation::new("sale_date", &e));
        }

        if self.items.is_empty() {
            violations.push(Violation::message(
                "items",
                "sale must have at least one item",
            ));
        }

        for (idx, item) in self.items.iter().enumerate() {
            if let Err(e) = validate_reference("product_id", &item.product_id) {
                violations.push(Violation::new(format!("items[{}].product_id", idx), &e));
            }
            if let Err(e) = validate_quantity(item.quantity) {
                violations.push(Violation::new(format!("items[{}].quantity", idx), &e));
            }
        }

        violations
    }
}

// =============================================================================
// Update Sale
// =============================================================================

/// Replaces the mutable header fields and the item set of an existing sale.
///
/// Items carrying an `id` update the matching line; items without one are
/// added as new lines. Lines present on the sale but absent from `items`
/// are removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSale {
    pub id: String,
    pub branch_id: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<UpdateSaleItem>,
}

/// One requested line on an updated sale.
///
/// `unit_price` is the caller's view of the price and is checked for shape
/// only; the service snapshots the catalog price when executing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl UpdateSale {
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Err(e) = validate_reference("id", &self.id) {
            violations.push(Violation::new("id", &e));
        }
        if let Err(e) = validate_reference("branch_id", &self.branch_id) {
            violations.push(Violation::new("branch_id", &e));
        }
        if let Err(e) = validate_sale_date(self.sale_date) {
            violations.push(Violation::new("sale_date", &e));
        }

        if self.items.is_empty() {
            violations.push(Violation::message(
                "items",
                "sale must have at least one item",
            ));
        }

        for (idx, item) in self.items.iter().enumerate() {
            if let Some(id) = &item.id {
                if let Err(e) = validate_reference("id", id) {
                    violations.push(Violation::new(format!("items[{}].id", idx), &e));
                }
            }
            if let Err(e) = validate_reference("product_id", &item.product_id) {
                violations.push(Violation::new(format!("items[{}].product_id", idx), &e));
            }
            if let Err(e) = validate_quantity(item.quantity) {
                violations.push(Violation::new(format!("items[{}].quantity", idx), &e));
            }
            if let Err(e) = validate_unit_price(item.unit_price) {
                violations.push(Violation::new(format!("items[{}].unit_price", idx), &e));
            }
        }

        violations
    }
}

// =============================================================================
// Cancel Sale / Cancel Sale Item
// =============================================================================

/// Requests cancellation of a whole sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSale {
    pub id: String,
}

impl CancelSale {
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if let Err(e) = validate_reference("id", &self.id) {
            violations.push(Violation::new("id", &e));
        }
        violations
    }
}

/// Requests cancellation of a single line on a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelSaleItem {
    pub sale_id: String,
    pub item_id: String,
}

impl CancelSaleItem {
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if let Err(e) = validate_reference("sale_id", &self.sale_id) {
            violations.push(Violation::new("sale_id", &e));
        }
        if let Err(e) = validate_reference("item_id", &self.item_id) {
            violations.push(Violation::new("item_id", &e));
        }
        violations
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
