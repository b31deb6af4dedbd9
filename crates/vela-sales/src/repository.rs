//! # Storage Contracts
//!
//! Trait contracts for the two storage collaborators, plus in-memory
//! implementations for tests and lightweight embedding.
//!
//! ## Contract Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleRepository                                                         │
//! │  ├── get_by_id             header only, items left empty                │
//! │  ├── get_by_id_with_items  full aggregate                               │
//! │  ├── add                   insert, Conflict when the id exists          │
//! │  └── save                  write back a previously loaded aggregate     │
//! │                                                                         │
//! │  ProductCatalog                                                         │
//! │  └── current_price         price lookup; None when the product is      │
//! │                            unknown (absence is data, not an error)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use vela_core::Money;

use crate::sale::Sale;

/// Storage collaborator failures.
///
/// Infrastructure errors only; "not found" is expressed as `Option` on the
/// lookup methods because absence is a normal answer, not a failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Insert collided with an existing entity.
    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    /// Backend failure (connection lost, constraint violation, ...).
    #[error("storage error: {0}")]
    Storage(String),
}

// =============================================================================
// Contracts
// =============================================================================

/// Persistence contract for the sale aggregate.
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Loads the sale header without its items. Cheap existence and totals
    /// check for callers that do not need the lines.
    async fn get_by_id(&self, id: &str) -> Result<Option<Sale>, RepositoryError>;

    /// Loads the full aggregate including every item, cancelled or not.
    async fn get_by_id_with_items(&self, id: &str) -> Result<Option<Sale>, RepositoryError>;

    /// Inserts a new sale.
    async fn add(&self, sale: &Sale) -> Result<(), RepositoryError>;

    /// Writes back a previously loaded aggregate.
    async fn save(&self, sale: &Sale) -> Result<(), RepositoryError>;
}

/// Price lookup for the product catalog.
///
/// The sale stores a snapshot of this price at add/update time; the catalog
/// is never consulted again for persisted lines.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn current_price(&self, product_id: &str) -> Result<Option<Money>, RepositoryError>;
}

#[async_trait]
impl<T: SaleRepository + ?Sized> SaleRepository for std::sync::Arc<T> {
    async fn get_by_id(&self, id: &str) -> Result<Option<Sale>, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_by_id_with_items(&self, id: &str) -> Result<Option<Sale>, RepositoryError> {
        (**self).get_by_id_with_items(id).await
    }

    async fn add(&self, sale: &Sale) -> Result<(), RepositoryError> {
        (**self).add(sale).await
    }

    async fn save(&self, sale: &Sale) -> Result<(), RepositoryError> {
        (**self).save(sale).await
    }
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for std::sync::Arc<T> {
    async fn current_price(&self, product_id: &str) -> Result<Option<Money>, RepositoryError> {
        (**self).current_price(product_id).await
    }
}

// =============================================================================
// In-Memory Implementations
// =============================================================================

/// HashMap-backed repository. Used by the test suites and by embedders that
/// want the engine without a database.
#[derive(Debug, Default)]
pub struct InMemorySaleRepository {
    sales: RwLock<HashMap<String, Sale>>,
}

impl InMemorySaleRepository {
    pub fn new() -> Self {
        InMemorySaleRepository::default()
    }

    /// Number of stored sales.
    pub async fn len(&self) -> usize {
        self.sales.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sales.read().await.is_empty()
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<Sale>, RepositoryError> {
        let sales = self.sales.read().await;
        Ok(sales.get(id).map(|sale| {
            let mut header = sale.clone();
            header.items.clear();
            header
        }))
    }

    async fn get_by_id_with_items(&self, id: &str) -> Result<Option<Sale>, RepositoryError> {
        let sales = self.sales.read().await;
        Ok(sales.get(id).cloned())
    }

    async fn add(&self, sale: &Sale) -> Result<(), RepositoryError> {
        let mut sales = self.sales.write().await;
        if sales.contains_key(sale.id()) {
            return Err(RepositoryError::Conflict {
                entity: "Sale",
                id: sale.id().to_string(),
            });
        }
        sales.insert(sale.id().to_string(), sale.clone());
        Ok(())
    }

    async fn save(&self, sale: &Sale) -> Result<(), RepositoryError> {
        let mut sales = self.sales.write().await;
        sales.insert(sale.id().to_string(), sale.clone());
        Ok(())
    }
}

/// HashMap-backed catalog with fixed prices.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    prices: RwLock<HashMap<String, Money>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Sets (or replaces) the price for a product.
    pub async fn set_price(&self, product_id: impl Into<String>, price: Money) {
        self.prices.write().await.insert(product_id.into(), price);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn current_price(&self, product_id: &str) -> Result<Option<Money>, RepositoryError> {
        Ok(self.prices.read().await.get(product_id).copied())
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

    #[tokio::test]
    async fn test_add_then_load() {
        let repo = InMemorySaleRepository::new();
        let sale = sample_sale();
        repo.add(&sale).await.unwrap();

        let loaded = repo.get_by_id_with_items(sale.id()).await.unwrap().unwrap();
        assert_eq!(loaded, sale);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_by_id_omits_items() {
        let repo = InMemorySaleRepository::new();
        let sale = sample_sale();
        repo.add(&sale).await.unwrap();

        let header = repo.get_by_id(sale.id()).await.unwrap().unwrap();
        assert!(header.items().is_empty());
        // Totals still present on the header
        assert_eq!(header.total_amount().cents(), 45_000);
    }

    #[tokio::test]
    async fn test_add_twice_conflicts() {
        let repo = InMemorySaleRepository::new();
        let sale = sample_sale();
        repo.add(&sale).await.unwrap();

        let err = repo.add(&sale).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let repo = InMemorySaleRepository::new();
        let mut sale = sample_sale();
        repo.add(&sale).await.unwrap();

        sale.cancel();
        repo.save(&sale).await.unwrap();

        let loaded = repo.get_by_id_with_items(sale.id()).await.unwrap().unwrap();
        assert!(loaded.is_cancelled());
    }

    #[tokio::test]
    async fn test_missing_sale_is_none() {
        let repo = InMemorySaleRepository::new();
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
        assert!(repo
            .get_by_id_with_items("missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_catalog_lookup() {
        let catalog = InMemoryCatalog::new();
        catalog.set_price("prod-1", Money::from_cents(10_000)).await;

        assert_eq!(
            catalog.current_price("prod-1").await.unwrap(),
            Some(Money::from_cents(10_000))
        );
        assert_eq!(catalog.current_price("prod-2").await.unwrap(), None);
    }
}
