//! # Domain Events
//!
//! Events published after a sale mutation is persisted.
//!
//! ## Delivery Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  persist ──► publish (fire-and-forget)                                  │
//! │                                                                         │
//! │  Publication happens AFTER the repository write succeeds. A publish     │
//! │  failure is logged and swallowed: the sale is already saved, and the    │
//! │  command must not fail because a downstream consumer is unreachable.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads carry identifiers and money amounts only, never whole entities;
//! consumers that need more load it themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use vela_core::Money;

use crate::sale::Sale;

// =============================================================================
// Event Payloads
// =============================================================================

/// A sale was created and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreated {
    pub id: String,
    pub branch_id: String,
    pub customer_id: String,
    pub sale_date: DateTime<Utc>,
    pub total_amount: Money,
    pub item_count: usize,
}

/// A sale's header or item set was modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleModified {
    pub id: String,
    pub branch_id: String,
    pub old_total: Money,
    pub new_total: Money,
}

/// A whole sale was cancelled; `refund_amount` is the frozen total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCancelled {
    pub id: String,
    pub branch_id: String,
    pub refund_amount: Money,
    pub cancelled_at: DateTime<Utc>,
}

/// A single line was cancelled; the sale itself stays live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemCancelled {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub refund_amount: Money,
    pub cancelled_at: DateTime<Utc>,
}

// =============================================================================
// Event Envelope
// =============================================================================

/// Every event the sales service can publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SaleEvent {
    SaleCreated(SaleCreated),
    SaleModified(SaleModified),
    SaleCancelled(SaleCancelled),
    SaleItemCancelled(SaleItemCancelled),
}

impl SaleEvent {
    /// Builds a creation event from a freshly persisted sale.
    pub fn created(sale: &Sale) -> Self {
        SaleEvent::SaleCreated(SaleCreated {
            id: sale.id().to_string(),
            branch_id: sale.branch_id().to_string(),
            customer_id: sale.customer_id().to_string(),
            sale_date: sale.sale_date(),
            total_amount: sale.total_amount(),
            item_count: sale.items().len(),
        })
    }

    /// Builds a modification event carrying the total before and after.
    pub fn modified(sale: &Sale, old_total: Money) -> Self {
        SaleEvent::SaleModified(SaleModified {
            id: sale.id().to_string(),
            branch_id: sale.branch_id().to_string(),
            old_total,
            new_total: sale.total_amount(),
        })
    }

    /// Builds a whole-sale cancellation event.
    pub fn cancelled(sale: &Sale, cancelled_at: DateTime<Utc>) -> Self {
        SaleEvent::SaleCancelled(SaleCancelled {
            id: sale.id().to_string(),
            branch_id: sale.branch_id().to_string(),
            refund_amount: sale.total_amount(),
            cancelled_at,
        })
    }

    /// The event's sale id, for correlation in logs.
    pub fn sale_id(&self) -> &str {
        match self {
            SaleEvent::SaleCreated(e) => &e.id,
            SaleEvent::SaleModified(e) => &e.id,
            SaleEvent::SaleCancelled(e) => &e.id,
            SaleEvent::SaleItemCancelled(e) => &e.sale_id,
        }
    }

    /// Stable name of the event kind, for logs and routing keys.
    pub fn kind(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "sale_created",
            SaleEvent::SaleModified(_) => "sale_modified",
            SaleEvent::SaleCancelled(_) => "sale_cancelled",
            SaleEvent::SaleItemCancelled(_) => "sale_item_cancelled",
        }
    }
}

// =============================================================================
// Publisher Contract
// =============================================================================

/// Failure to hand an event to the transport.
#[derive(Debug, Error)]
#[error("event publish failed: {0}")]
pub struct PublishError(pub String);

/// Outbound event transport.
///
/// Implementations deliver to a broker, an outbox table, or nothing at all.
/// The service treats delivery as best-effort.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: SaleEvent) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<T> {
    async fn publish(&self, event: SaleEvent) -> Result<(), PublishError> {
        (**self).publish(event).await
    }
}

/// Publisher that drops every event. The default for embedders that do not
/// care about events.
#[derive(Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: SaleEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Publisher that records every event in memory, in publication order.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: RwLock<Vec<SaleEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        RecordingPublisher::default()
    }

    /// Snapshot of everything published so far.
    pub async fn events(&self) -> Vec<SaleEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: SaleEvent) -> Result<(), PublishError> {
        self.events.write().await.push(event);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_sale() -> Sale {
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
        sale
    }

    #[test]
    fn test_created_event_snapshot() {
        let sale = sample_sale();
        let event = SaleEvent::created(&sale);

        match &event {
            SaleEvent::SaleCreated(e) => {
                assert_eq!(e.id, sale.id());
                assert_eq!(e.total_amount.cents(), 45_000);
                assert_eq!(e.item_count, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(event.kind(), "sale_created");
        assert_eq!(event.sale_id(), sale.id());
    }

    #[test]
    fn test_cancelled_event_carries_frozen_refund() {
        let mut sale = sample_sale();
        sale.cancel();
        let at = sale.cancelled_at().unwrap();

        let event = SaleEvent::cancelled(&sale, at);
        match event {
            SaleEvent::SaleCancelled(e) => {
                assert_eq!(e.refund_amount.cents(), 45_000);
                assert_eq!(e.cancelled_at, at);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_json_shape() {
        let sale = sample_sale();
        let json = serde_json::to_value(SaleEvent::created(&sale)).unwrap();

        assert_eq!(json["type"], "sale_created");
        assert_eq!(json["payload"]["totalAmount"], 45_000);
    }

    #[tokio::test]
    async fn test_recording_publisher_keeps_order() {
        let publisher = RecordingPublisher::new();
        let sale = sample_sale();

        publisher.publish(SaleEvent::created(&sale)).await.unwrap();
        publisher
            .publish(SaleEvent::modified(&sale, Money::zero()))
            .await
            .unwrap();

        let events = publisher.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "sale_created");
        assert_eq!(events[1].kind(), "sale_modified");
    }
}
