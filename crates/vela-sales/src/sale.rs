//! # Sale Aggregate
//!
//! The `Sale` aggregate root and its `SaleItem` lines.
//!
//! ## Consistency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sale Aggregate Invariants                          │
//! │                                                                         │
//! │  Every item:     discount_percent == tier(quantity)                     │
//! │                  subtotal == unit_price × quantity                      │
//! │                  total == subtotal − discount_amount                    │
//! │                                                                         │
//! │  The sale:       subtotal/discount/total == Σ over NON-CANCELLED items  │
//! │                                                                         │
//! │  Derived fields are never set by callers. Every mutation goes through   │
//! │  an aggregate method, and every method leaves the invariants intact.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation Semantics
//! - `Sale::cancel` cascades to every item and RETAINS the pre-cancellation
//!   totals. The frozen totals are the refund value of the sale.
//! - `Sale::cancel_item` excludes the item and RECALCULATES, shrinking the
//!   sale totals by the cancelled line.
//! - Both are idempotent at this level; the command service decides whether
//!   a repeat cancellation is an error.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vela_core::validation::{
    validate_cancelled_after_created, validate_quantity, validate_reference, validate_unit_price,
    Violation,
};
use vela_core::{check_tier, discount_for, AuditFields, CoreResult, Money};

use crate::error::{SalesError, SalesResult};

/// Picks a cancellation instant strictly after `created_at`.
///
/// Wall clocks can be coarse enough that "now" equals the creation instant;
/// nudge forward by a microsecond rather than record an impossible ordering.
fn cancellation_instant(created_at: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > created_at {
        now
    } else {
        created_at + Duration::microseconds(1)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A single product line on a sale.
///
/// Unit price is a snapshot taken from the catalog at add/update time: later
/// catalog price changes never rewrite history. The discount fields are
/// derived from quantity alone and are recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub(crate) id: String,
    pub(crate) product_id: String,
    pub(crate) quantity: i64,
    pub(crate) unit_price: Money,
    pub(crate) discount_percent: u32,
    pub(crate) subtotal: Money,
    pub(crate) discount_amount: Money,
    pub(crate) total: Money,
    pub(crate) is_cancelled: bool,
    pub(crate) cancelled_at: Option<DateTime<Utc>>,
    pub(crate) audit: AuditFields,
}

impl SaleItem {
    /// Creates an item and derives its discount fields.
    ///
    /// ## Errors
    /// - `InvalidQuantity` when quantity is outside [1, 20]
    /// - `Validation` when the unit price is not strictly positive
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price: Money) -> CoreResult<Self> {
        validate_unit_price(unit_price.cents())?;

        let mut item = SaleItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            quantity,
            unit_price,
            discount_percent: 0,
            subtotal: Money::zero(),
            discount_amount: Money::zero(),
            total: Money::zero(),
            is_cancelled: false,
            cancelled_at: None,
            audit: AuditFields::now(),
        };
        item.apply_discount()?;
        Ok(item)
    }

    /// Re-derives discount percentage and the three money fields from the
    /// current quantity and unit price.
    ///
    /// This is the only code path that writes the derived fields.
    pub fn apply_discount(&mut self) -> CoreResult<()> {
        let tier = discount_for(self.quantity)?;

        self.discount_percent = tier.percent();
        self.subtotal = self.unit_price.multiply_quantity(self.quantity);
        self.discount_amount = self.subtotal.percentage(self.discount_percent);
        self.total = self.subtotal - self.discount_amount;
        self.audit.touch();

        Ok(())
    }

    /// Replaces quantity and unit price, then re-derives the money fields.
    pub fn reprice(&mut self, quantity: i64, unit_price: Money) -> CoreResult<()> {
        validate_unit_price(unit_price.cents())?;

        self.quantity = quantity;
        self.unit_price = unit_price;
        self.apply_discount()
    }

    /// Cancels the item. Idempotent: a second call changes nothing.
    ///
    /// Returns `true` if the item transitioned to cancelled on this call.
    pub fn cancel(&mut self) -> bool {
        if self.is_cancelled {
            return false;
        }

        self.is_cancelled = true;
        self.cancelled_at = Some(cancellation_instant(self.audit.created_at));
        self.audit.touch();
        true
    }

    /// Checks this line against the discount policy and its own derived
    /// fields, collecting every violation.
    ///
    /// Field names are bare (`quantity`, `discount_percent`, ...); callers
    /// validating a whole sale prefix them with the item's position.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Err(e) = validate_reference("product_id", &self.product_id) {
            violations.push(Violation::new("product_id", &e));
        }
        if let Err(e) = validate_quantity(self.quantity) {
            violations.push(Violation::new("quantity", &e));
        }
        if let Err(e) = validate_unit_price(self.unit_price.cents()) {
            violations.push(Violation::new("unit_price", &e));
        }
        if let Err(e) = check_tier(self.quantity, self.discount_percent) {
            violations.push(Violation::message("discount_percent", e.to_string()));
        }
        if let Err(e) = validate_cancelled_after_created(self.cancelled_at, self.audit.created_at)
        {
            violations.push(Violation::new("cancelled_at", &e));
        }

        // Stored derived fields must match what the inputs imply.
        if self.subtotal != self.unit_price.multiply_quantity(self.quantity) {
            violations.push(Violation::message(
                "subtotal",
                "subtotal does not equal unit_price × quantity",
            ));
        }
        if self.total != self.subtotal - self.discount_amount {
            violations.push(Violation::message(
                "total",
                "total does not equal subtotal minus discount",
            ));
        }

        violations
    }

    // -- Accessors ------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount_percent(&self) -> u32 {
        self.discount_percent
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn audit(&self) -> &AuditFields {
        &self.audit
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The sale aggregate root.
///
/// Holds identity (UUID `id` plus human-readable `number`), external
/// references, the item lines, and the three derived totals. All references
/// to branch, customer and products are plain identifiers; this crate never
/// loads those entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub(crate) id: String,
    pub(crate) number: String,
    pub(crate) branch_id: String,
    pub(crate) customer_id: String,
    pub(crate) sale_date: DateTime<Utc>,
    pub(crate) items: Vec<SaleItem>,
    pub(crate) subtotal: Money,
    pub(crate) discount_total: Money,
    pub(crate) total_amount: Money,
    pub(crate) is_cancelled: bool,
    pub(crate) cancelled_at: Option<DateTime<Utc>>,
    pub(crate) audit: AuditFields,
}

impl Sale {
    /// Creates an empty sale with zeroed totals.
    pub fn new(
        number: impl Into<String>,
        branch_id: impl Into<String>,
        customer_id: impl Into<String>,
        sale_date: DateTime<Utc>,
    ) -> Self {
        Sale {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            branch_id: branch_id.into(),
            customer_id: customer_id.into(),
            sale_date,
            items: Vec::new(),
            subtotal: Money::zero(),
            discount_total: Money::zero(),
            total_amount: Money::zero(),
            is_cancelled: false,
            cancelled_at: None,
            audit: AuditFields::now(),
        }
    }

    /// Adds a product line and recalculates the sale totals.
    ///
    /// ## Errors
    /// - `CannotModifyCancelledSale` when the sale is cancelled
    /// - `Core(InvalidQuantity)` when quantity is outside [1, 20]
    /// - `Core(Validation)` when the unit price is not positive
    pub fn add_item(
        &mut self,
        product_id: impl Into<String>,
        quantity: i64,
        unit_price: Money,
    ) -> SalesResult<&SaleItem> {
        if self.is_cancelled {
            return Err(SalesError::CannotModifyCancelledSale {
                id: self.id.clone(),
            });
        }

        let item = SaleItem::new(product_id, quantity, unit_price)?;
        let idx = self.items.len();
        self.items.push(item);
        self.recalculate_totals();

        Ok(&self.items[idx])
    }

    /// Recomputes the three sale totals from the non-cancelled items.
    ///
    /// Cancelled items contribute nothing; they stay on the sale purely as
    /// history.
    pub fn recalculate_totals(&mut self) {
        let active = self.items.iter().filter(|i| !i.is_cancelled);

        let mut subtotal = Money::zero();
        let mut discount = Money::zero();
        for item in active {
            subtotal += item.subtotal;
            discount += item.discount_amount;
        }

        self.subtotal = subtotal;
        self.discount_total = discount;
        self.total_amount = subtotal - discount;
        self.audit.touch();
    }

    /// Cancels the whole sale, cascading to every item.
    ///
    /// Totals are deliberately NOT recalculated: the frozen amounts are the
    /// refund value of the sale. Idempotent; returns `true` on the call that
    /// performed the transition.
    pub fn cancel(&mut self) -> bool {
        if self.is_cancelled {
            return false;
        }

        self.is_cancelled = true;
        self.cancelled_at = Some(cancellation_instant(self.audit.created_at));
        for item in &mut self.items {
            item.cancel();
        }
        self.audit.touch();
        true
    }

    /// Cancels a single item and recalculates the sale totals.
    ///
    /// Returns the refund value of the line (its pre-cancellation total), or
    /// zero when the item was already cancelled.
    ///
    /// ## Errors
    /// `NotFound` when no item with the given id exists on this sale.
    pub fn cancel_item(&mut self, item_id: &str) -> SalesResult<Money> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| SalesError::item_not_found(item_id))?;

        let refund = if item.cancel() { item.total } else { Money::zero() };
        self.recalculate_totals();
        Ok(refund)
    }

    /// Drops every item whose id is not in `keep_ids`.
    ///
    /// Used when an update command omits previously present lines; the
    /// caller recalculates afterwards.
    pub(crate) fn remove_items_not_in(&mut self, keep_ids: &[&str]) {
        self.items.retain(|i| keep_ids.contains(&i.id.as_str()));
    }

    // -- Accessors ------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn sale_date(&self) -> DateTime<Utc> {
        self.sale_date
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn item(&self, item_id: &str) -> Option<&SaleItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: &str) -> Option<&mut SaleItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_total(&self) -> Money {
        self.discount_total
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn audit(&self) -> &AuditFields {
        &self.audit
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
