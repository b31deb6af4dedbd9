//! # Sale Command Service
//!
//! Orchestrates the four sale use cases over the storage and event
//! collaborators.
//!
//! ## Execution Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► shape check ──► load ──► guard lifecycle ──► mutate        │
//! │                                                              │          │
//! │                         view ◄── publish ◄── persist ◄── rule set      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rule set runs against the mutated aggregate right before persistence;
//! nothing that fails it is ever written. Event publication is best-effort
//! and happens only after the write succeeds.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use vela_core::Violation;

use crate::commands::{CancelSale, CancelSaleItem, CreateSale, UpdateSale};
use crate::error::{SalesError, SalesResult};
use crate::events::{EventPublisher, SaleEvent, SaleItemCancelled};
use crate::projection::SaleView;
use crate::repository::{ProductCatalog, SaleRepository};
use crate::rules::SaleValidator;
use crate::sale::Sale;

/// Generates a human-readable sale number: sale date plus a random suffix.
///
/// Uniqueness is best-effort; the UUID `id` is the real identity and the
/// repository never keys on the number.
fn generate_sale_number(sale_date: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().as_u128() % 10_000;
    format!("{}-{:04}", sale_date.format("%Y%m%d"), suffix)
}

fn ensure_valid(violations: Vec<Violation>) -> SalesResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SalesError::Validation(violations))
    }
}

/// The sale command service.
///
/// Generic over its collaborators so hosts can plug in real storage and a
/// real broker, and tests can plug in the in-memory implementations.
pub struct SaleCommandService<R, C, P> {
    repository: R,
    catalog: C,
    publisher: P,
    validator: SaleValidator,
}

impl<R, C, P> SaleCommandService<R, C, P>
where
    R: SaleRepository,
    C: ProductCatalog,
    P: EventPublisher,
{
    pub fn new(repository: R, catalog: C, publisher: P) -> Self {
        SaleCommandService {
            repository,
            catalog,
            publisher,
            validator: SaleValidator::new(),
        }
    }

    /// Creates a sale from the requested lines, pricing each against the
    /// catalog.
    pub async fn create_sale(&self, cmd: CreateSale) -> SalesResult<SaleView> {
        debug!(
            branch_id = %cmd.branch_id,
            customer_id = %cmd.customer_id,
            item_count = cmd.items.len(),
            "creating sale"
        );
        ensure_valid(cmd.validate())?;

        let mut sale = Sale::new(
            generate_sale_number(cmd.sale_date),
            cmd.branch_id,
            cmd.customer_id,
            cmd.sale_date,
        );

        for item in &cmd.items {
            let price = self.resolve_price(&item.product_id).await?;
            sale.add_item(item.product_id.clone(), item.quantity, price)?;
        }

        ensure_valid(self.validator.validate(&sale))?;
        self.repository.add(&sale).await?;

        info!(
            sale_id = %sale.id(),
            number = %sale.number(),
            total = %sale.total_amount(),
            "sale created"
        );
        self.publish(SaleEvent::created(&sale)).await;

        Ok(SaleView::from(&sale))
    }

    /// Replaces the mutable header fields and reconciles the item set of an
    /// existing sale.
    ///
    /// Every surviving line is re-priced against the catalog; lines absent
    /// from the command are removed.
    pub async fn update_sale(&self, cmd: UpdateSale) -> SalesResult<SaleView> {
        debug!(sale_id = %cmd.id, item_count = cmd.items.len(), "updating sale");
        ensure_valid(cmd.validate())?;

        let mut sale = self
            .repository
            .get_by_id_with_items(&cmd.id)
            .await?
            .ok_or_else(|| SalesError::sale_not_found(&cmd.id))?;

        if sale.is_cancelled() {
            return Err(SalesError::CannotModifyCancelledSale {
                id: sale.id().to_string(),
            });
        }

        let old_total = sale.total_amount();

        sale.branch_id = cmd.branch_id;
        sale.sale_date = cmd.sale_date;

        let keep: Vec<&str> = cmd
            .items
            .iter()
            .filter_map(|i| i.id.as_deref())
            .collect();
        sale.remove_items_not_in(&keep);

        for item in &cmd.items {
            let price = self.resolve_price(&item.product_id).await?;

            match &item.id {
                Some(id) => {
                    let line = sale
                        .item_mut(id)
                        .ok_or_else(|| SalesError::item_not_found(id))?;
                    if line.is_cancelled() {
                        return Err(SalesError::item_already_cancelled(id));
                    }
                    line.product_id = item.product_id.clone();
                    line.reprice(item.quantity, price)?;
                }
                None => {
                    sale.add_item(item.product_id.clone(), item.quantity, price)?;
                }
            }
        }

        sale.recalculate_totals();
        ensure_valid(self.validator.validate(&sale))?;
        self.repository.save(&sale).await?;

        info!(
            sale_id = %sale.id(),
            old_total = %old_total,
            new_total = %sale.total_amount(),
            "sale updated"
        );
        self.publish(SaleEvent::modified(&sale, old_total)).await;

        Ok(SaleView::from(&sale))
    }

    /// Cancels a whole sale, cascading to every line.
    ///
    /// The sale keeps its pre-cancellation totals as the refund value.
    /// Cancelling an already-cancelled sale is rejected.
    pub async fn cancel_sale(&self, cmd: CancelSale) -> SalesResult<SaleView> {
        debug!(sale_id = %cmd.id, "cancelling sale");
        ensure_valid(cmd.validate())?;

        let mut sale = self
            .repository
            .get_by_id_with_items(&cmd.id)
            .await?
            .ok_or_else(|| SalesError::sale_not_found(&cmd.id))?;

        if sale.is_cancelled() {
            return Err(SalesError::sale_already_cancelled(sale.id()));
        }

        sale.cancel();
        let cancelled_at = sale.cancelled_at().unwrap_or_else(Utc::now);

        ensure_valid(self.validator.validate(&sale))?;
        self.repository.save(&sale).await?;

        info!(
            sale_id = %sale.id(),
            refund = %sale.total_amount(),
            "sale cancelled"
        );
        self.publish(SaleEvent::cancelled(&sale, cancelled_at)).await;

        Ok(SaleView::from(&sale))
    }

    /// Cancels a single line; the sale stays live and its totals shrink by
    /// the cancelled amount.
    pub async fn cancel_item(&self, cmd: CancelSaleItem) -> SalesResult<SaleView> {
        debug!(sale_id = %cmd.sale_id, item_id = %cmd.item_id, "cancelling sale item");
        ensure_valid(cmd.validate())?;

        let mut sale = self
            .repository
            .get_by_id_with_items(&cmd.sale_id)
            .await?
            .ok_or_else(|| SalesError::sale_not_found(&cmd.sale_id))?;

        let line = sale
            .item(&cmd.item_id)
            .ok_or_else(|| SalesError::item_not_found(&cmd.item_id))?;
        if line.is_cancelled() {
            return Err(SalesError::item_already_cancelled(&cmd.item_id));
        }

        let product_id = line.product_id().to_string();
        let quantity = line.quantity();
        let refund = sale.cancel_item(&cmd.item_id)?;
        let cancelled_at = sale
            .item(&cmd.item_id)
            .and_then(|i| i.cancelled_at())
            .unwrap_or_else(Utc::now);

        ensure_valid(self.validator.validate(&sale))?;
        self.repository.save(&sale).await?;

        info!(
            sale_id = %sale.id(),
            item_id = %cmd.item_id,
            refund = %refund,
            "sale item cancelled"
        );
        self.publish(SaleEvent::SaleItemCancelled(SaleItemCancelled {
            id: cmd.item_id.clone(),
            sale_id: sale.id().to_string(),
            product_id,
            quantity,
            refund_amount: refund,
            cancelled_at,
        }))
        .await;

        Ok(SaleView::from(&sale))
    }

    /// Loads a sale projection, items included.
    pub async fn get_sale(&self, id: &str) -> SalesResult<Option<SaleView>> {
        let sale = self.repository.get_by_id_with_items(id).await?;
        Ok(sale.as_ref().map(SaleView::from))
    }

    /// Looks up the catalog price for a product.
    async fn resolve_price(&self, product_id: &str) -> SalesResult<vela_core::Money> {
        self.catalog
            .current_price(product_id)
            .await?
            .ok_or_else(|| SalesError::product_not_found(product_id))
    }

    /// Best-effort event delivery; failures are logged, never surfaced.
    async fn publish(&self, event: SaleEvent) {
        let kind = event.kind();
        let sale_id = event.sale_id().to_string();
        if let Err(e) = self.publisher.publish(event).await {
            warn!(kind, sale_id = %sale_id, error = %e, "event publish failed");
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
    fn test_sale_number_is_date_prefixed() {
        let date = "2026-08-25T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let number = generate_sale_number(date);

        assert!(number.starts_with("20260825-"));
        assert_eq!(number.len(), "20260825-".len() + 4);
    }

    #[test]
    fn test_ensure_valid_passes_empty() {
        assert!(ensure_valid(Vec::new()).is_ok());

        let err = ensure_valid(vec![Violation::message("items", "boom")]).unwrap_err();
        assert!(matches!(err, SalesError::Validation(v) if v.len() == 1));
    }
}
