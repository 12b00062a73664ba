//! Stock room repository.

use chrono::NaiveDate;
use wakalni_core::InventoryItemId;
use wakalni_core::inventory::{InventoryDraft, InventoryFilter, InventoryItem, StockChange};

use super::{RepositoryError, Store};

/// Repository for the admin restaurant's inventory.
pub struct InventoryRepository<'a> {
    store: &'a Store,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Every stock item, in insertion order.
    pub async fn all(&self) -> Vec<InventoryItem> {
        self.store.inventory.read().await.clone()
    }

    /// Stock items matching the search box and category dropdown.
    pub async fn list(&self, filter: &InventoryFilter) -> Vec<InventoryItem> {
        let items = self.store.inventory.read().await;
        items.iter().filter(|item| filter.matches(item)).cloned().collect()
    }

    /// Add a stock item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Inventory` when the draft is invalid.
    pub async fn create(
        &self,
        draft: InventoryDraft,
        today: NaiveDate,
    ) -> Result<InventoryItem, RepositoryError> {
        let id = InventoryItemId::new(self.store.next_id("INV-"));
        let item = draft.into_item(id, today)?;
        self.store.inventory.write().await.push(item.clone());
        Ok(item)
    }

    /// Apply a manual stock adjustment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown item and `Inventory` for a
    /// non-positive quantity.
    pub async fn adjust(
        &self,
        id: &InventoryItemId,
        change: StockChange,
        today: NaiveDate,
    ) -> Result<InventoryItem, RepositoryError> {
        let mut items = self.store.inventory.write().await;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| RepositoryError::not_found("inventory item", id))?;
        item.apply(change, today)?;
        Ok(item.clone())
    }

    /// Remove a stock item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown item.
    pub async fn delete(&self, id: &InventoryItemId) -> Result<(), RepositoryError> {
        let mut items = self.store.inventory.write().await;
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            return Err(RepositoryError::not_found("inventory item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use wakalni_core::inventory::{StockChangeKind, low_stock_count};

    use super::*;
    use crate::db::tests::store;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_low_stock() {
        let store = store();
        let items = InventoryRepository::new(&store).all().await;
        assert_eq!(items.len(), 5);
        assert_eq!(low_stock_count(&items), 1);
    }

    #[tokio::test]
    async fn test_adjust_and_delete() {
        let store = store();
        let repo = InventoryRepository::new(&store);
        let oil = InventoryItemId::new("5");

        let refilled = repo
            .adjust(
                &oil,
                StockChange {
                    kind: StockChangeKind::Add,
                    quantity: Decimal::from(3),
                },
                today(),
            )
            .await
            .unwrap();
        assert_eq!(refilled.current_stock, Decimal::from(4));
        assert_eq!(refilled.last_updated, today());

        let zero = repo
            .adjust(
                &oil,
                StockChange {
                    kind: StockChangeKind::Remove,
                    quantity: Decimal::ZERO,
                },
                today(),
            )
            .await;
        assert!(matches!(zero, Err(RepositoryError::Inventory(_))));

        repo.delete(&oil).await.unwrap();
        assert!(matches!(
            repo.delete(&oil).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_and_filter() {
        let store = store();
        let repo = InventoryRepository::new(&store);
        repo.create(
            InventoryDraft {
                name: "Semolina".to_owned(),
                category: "bakery".to_owned(),
                current_stock: Some(Decimal::from(12)),
                ..InventoryDraft::default()
            },
            today(),
        )
        .await
        .unwrap();

        let bakery = repo
            .list(&InventoryFilter {
                q: None,
                category: Some("bakery".to_owned()),
            })
            .await;
        assert_eq!(bakery.len(), 2);
    }
}
