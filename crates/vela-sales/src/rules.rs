//! # Aggregate Rule Set
//!
//! Whole-aggregate validation run before a sale is persisted.
//!
//! ## Why a Second Pass?
//! The aggregate methods already keep the invariants, so on the happy path
//! this pass finds nothing. It exists as a drift detector: state loaded from
//! storage, or mutated through a future code path that bypasses the
//! aggregate API, gets caught here before it is written back.
//!
//! Violations are COLLECTED, not short-circuited: the caller sees every
//! problem with the aggregate in one response.

use vela_core::validation::{
    validate_cancelled_after_created, validate_reference, validate_sale_date,
    validate_sale_number, Violation,
};

use crate::sale::Sale;

/// Stateless validator for the [`Sale`] aggregate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleValidator;

impl SaleValidator {
    pub fn new() -> Self {
        SaleValidator
    }

    /// Validates the whole aggregate, returning every violation found.
    ///
    /// An empty vector means the sale is fit to persist.
    pub fn validate(&self, sale: &Sale) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Err(e) = validate_sale_number(sale.number()) {
            violations.push(Violation::new("number", &e));
        }
        if let Err(e) = validate_reference("branch_id", sale.branch_id()) {
            violations.push(Violation::new("branch_id", &e));
        }
        if let Err(e) = validate_reference("customer_id", sale.customer_id()) {
            violations.push(Violation::new("customer_id", &e));
        }
        if let Err(e) = validate_sale_date(sale.sale_date()) {
            violations.push(Violation::new("sale_date", &e));
        }
        if let Err(e) =
            validate_cancelled_after_created(sale.cancelled_at(), sale.audit().created_at)
        {
            violations.push(Violation::new("cancelled_at", &e));
        }

        if sale.items().is_empty() && !sale.is_cancelled() {
            violations.push(Violation::message(
                "items",
                "sale must have at least one item",
            ));
        }

        for (idx, item) in sale.items().iter().enumerate() {
            violations.extend(item.validate().into_iter().map(|v| {
                Violation::message(format!("items[{}].{}", idx, v.field), v.message)
            }));
        }

        // Sale totals against the non-cancelled item sums.
        let mut subtotal = vela_core::Money::zero();
        let mut discount = vela_core::Money::zero();
        for item in sale.items().iter().filter(|i| !i.is_cancelled()) {
            subtotal += item.subtotal();
            discount += item.discount_amount();
        }

        // A cancelled sale keeps its frozen pre-cancellation totals, so the
        // sum check only applies while the sale is live.
        if !sale.is_cancelled() {
            if sale.subtotal() != subtotal {
                violations.push(Violation::message(
                    "subtotal",
                    "sale subtotal does not equal the sum of active item subtotals",
                ));
            }
            if sale.discount_total() != discount {
                violations.push(Violation::message(
                    "discount_total",
                    "sale discount does not equal the sum of active item discounts",
                ));
            }
            if sale.total_amount() != subtotal - discount {
                violations.push(Violation::message(
                    "total_amount",
                    "sale total does not equal subtotal minus discount",
                ));
            }
        }

        violations
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
