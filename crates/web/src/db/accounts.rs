//! Customer and restaurant staff repository.

use wakalni_core::accounts::{AccountQuery, Customer, RestaurantAdmin};
use wakalni_core::{AdminAction, AdminId, CustomerAction, CustomerId};

use super::{RepositoryError, Store};

/// Repository for accounts managed by the superadmin.
pub struct AccountRepository<'a> {
    store: &'a Store,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Customers matching the search box and status dropdown.
    pub async fn customers(&self, query: &AccountQuery) -> Vec<Customer> {
        let customers = self.store.customers.read().await;
        customers
            .iter()
            .filter(|c| query.matches_customer(c))
            .cloned()
            .collect()
    }

    /// Restaurant staff matching the search box and status dropdown.
    pub async fn admins(&self, query: &AccountQuery) -> Vec<RestaurantAdmin> {
        let admins = self.store.admins.read().await;
        admins
            .iter()
            .filter(|a| query.matches_admin(a))
            .cloned()
            .collect()
    }

    /// Ban or unban a customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown customer and `Transition` when the
    /// action does not apply to the current status.
    pub async fn apply_customer_action(
        &self,
        id: &CustomerId,
        action: CustomerAction,
    ) -> Result<Customer, RepositoryError> {
        let mut customers = self.store.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| RepositoryError::not_found("customer", id))?;
        customer.status = customer.status.apply(action)?;
        Ok(customer.clone())
    }

    /// Suspend or reactivate a restaurant staff account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown account and `Transition` when the
    /// action does not apply to the current status.
    pub async fn apply_admin_action(
        &self,
        id: &AdminId,
        action: AdminAction,
    ) -> Result<RestaurantAdmin, RepositoryError> {
        let mut admins = self.store.admins.write().await;
        let admin = admins
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| RepositoryError::not_found("admin", id))?;
        admin.status = admin.status.apply(action)?;
        Ok(admin.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wakalni_core::{AdminStatus, CustomerStatus};

    use super::*;
    use crate::db::tests::store;

    #[tokio::test]
    async fn test_customer_filters() {
        let store = store();
        let repo = AccountRepository::new(&store);
        let banned = repo
            .customers(&AccountQuery {
                q: None,
                status: Some("banned".to_owned()),
            })
            .await;
        assert_eq!(banned.len(), 1);
        assert_eq!(banned[0].name, "Carol Davis");

        let staff = repo
            .admins(&AccountQuery {
                q: Some("sushi".to_owned()),
                status: None,
            })
            .await;
        assert_eq!(staff.len(), 1);
    }

    #[tokio::test]
    async fn test_ban_and_unban() {
        let store = store();
        let repo = AccountRepository::new(&store);
        let alice = CustomerId::new("1");

        let banned = repo
            .apply_customer_action(&alice, CustomerAction::Ban)
            .await
            .unwrap();
        assert_eq!(banned.status, CustomerStatus::Banned);
        assert!(matches!(
            repo.apply_customer_action(&alice, CustomerAction::Ban).await,
            Err(RepositoryError::Transition(_))
        ));
    }

    #[tokio::test]
    async fn test_reactivate_admin() {
        let store = store();
        let repo = AccountRepository::new(&store);
        let mike = repo
            .apply_admin_action(&AdminId::new("3"), AdminAction::Reactivate)
            .await
            .unwrap();
        assert_eq!(mike.status, AdminStatus::Active);
        assert!(repo
            .apply_admin_action(&AdminId::new("99"), AdminAction::Suspend)
            .await
            .is_err());
    }
}
