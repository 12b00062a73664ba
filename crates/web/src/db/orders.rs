//! Order repository for the admin kitchen board.

use wakalni_core::orders::{Order, OrderFilter};
use wakalni_core::{OrderId, OrderStatus};

use super::{RepositoryError, Store};

/// Repository for the admin restaurant's orders.
pub struct OrderRepository<'a> {
    store: &'a Store,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// All orders, newest first.
    pub async fn all(&self) -> Vec<Order> {
        let mut orders = self.store.orders.read().await.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Orders matching the panel filters, newest first.
    pub async fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        self.all()
            .await
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect()
    }

    /// Reference for a freshly placed order.
    #[must_use]
    pub fn next_reference(&self) -> OrderId {
        OrderId::new(self.store.next_id("ORD-"))
    }

    /// Move an order along its workflow.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown order and `Transition` when the
    /// workflow forbids the move.
    pub async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.store.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| RepositoryError::not_found("order", id))?;
        order.set_status(status)?;
        Ok(order.clone())
    }
}
