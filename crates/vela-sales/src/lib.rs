//! # vela-sales: Sale Aggregate and Command Service
//!
//! Everything that makes a sale a sale: the aggregate with its derived
//! totals, the quantity-tier discount enforcement (via `vela-core`), the
//! whole-aggregate rule set, and the command service that drives the four
//! use cases against pluggable storage and event collaborators.
//!
//! ## The Four Use Cases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreateSale      price lines from the catalog, derive totals, insert   │
//! │  UpdateSale      reconcile the item set, re-price, re-derive, save     │
//! │  CancelSale      cascade to every line, freeze the refund totals       │
//! │  CancelSaleItem  exclude one line, shrink the totals, sale stays live  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust
//! use vela_core::Money;
//! use vela_sales::commands::{CreateSale, CreateSaleItem};
//! use vela_sales::events::RecordingPublisher;
//! use vela_sales::repository::{InMemoryCatalog, InMemorySaleRepository};
//! use vela_sales::service::SaleCommandService;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = InMemoryCatalog::new();
//! catalog
//!     .set_price("550e8400-e29b-41d4-a716-446655440002", Money::from_cents(10_000))
//!     .await;
//!
//! let service = SaleCommandService::new(
//!     InMemorySaleRepository::new(),
//!     catalog,
//!     RecordingPublisher::new(),
//! );
//!
//! let view = service
//!     .create_sale(CreateSale {
//!         branch_id: "550e8400-e29b-41d4-a716-446655440000".into(),
//!         customer_id: "550e8400-e29b-41d4-a716-446655440001".into(),
//!         sale_date: chrono::Utc::now(),
//!         items: vec![CreateSaleItem {
//!             product_id: "550e8400-e29b-41d4-a716-446655440002".into(),
//!             quantity: 5,
//!         }],
//!     })
//!     .await
//!     .unwrap();
//!
//! // 5 units lands in the 10% tier: 50,000 − 5,000
//! assert_eq!(view.total_amount, 45_000);
//! # }
//! ```

pub mod commands;
pub mod error;
pub mod events;
pub mod projection;
pub mod repository;
pub mod rules;
pub mod sale;
pub mod service;

pub use commands::{CancelSale, CancelSaleItem, CreateSale, CreateSaleItem, UpdateSale, UpdateSaleItem};
pub use error::{SalesError, SalesResult};
pub use events::{EventPublisher, SaleEvent};
pub use projection::{SaleItemView, SaleView};
pub use repository::{ProductCatalog, RepositoryError, SaleRepository};
pub use rules::SaleValidator;
pub use sale::{Sale, SaleItem};
pub use service::SaleCommandService;
