//! Wallet repository: restaurant, platform and client ledgers.

use chrono::{DateTime, Utc};
use wakalni_core::wallet::{Ledger, Transaction, TransferRequest};
use wakalni_core::{OrderId, Price, TransactionId};

use super::{RepositoryError, Store};

/// Whose wallet an operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOwner {
    /// The admin restaurant.
    Restaurant,
    /// The platform's commission wallet.
    Platform,
    /// A consumer, keyed by user id or `guest`.
    Client(String),
}

/// Repository for wallet ledgers.
pub struct WalletRepository<'a> {
    store: &'a Store,
}

impl<'a> WalletRepository<'a> {
    /// Create a new wallet repository.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Run `f` against the owner's ledger under its write lock.
    ///
    /// Client ledgers are created from the seed on first use.
    async fn with_ledger<T>(&self, owner: &WalletOwner, f: impl FnOnce(&mut Ledger) -> T) -> T {
        match owner {
            WalletOwner::Restaurant => f(&mut *self.store.restaurant_wallet.write().await),
            WalletOwner::Platform => f(&mut *self.store.platform_wallet.write().await),
            WalletOwner::Client(key) => {
                let mut wallets = self.store.client_wallets.write().await;
                let ledger = wallets
                    .entry(key.clone())
                    .or_insert_with(|| self.store.client_wallet_seed.clone());
                f(ledger)
            }
        }
    }

    /// Snapshot of a ledger.
    pub async fn ledger(&self, owner: &WalletOwner) -> Ledger {
        self.with_ledger(owner, |ledger| ledger.clone()).await
    }

    /// Record a pending withdrawal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Wallet` when the request is invalid or
    /// exceeds the balance.
    pub async fn withdraw(
        &self,
        owner: &WalletOwner,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError> {
        let id = TransactionId::new(self.store.next_id("TXN-"));
        let transaction = self
            .with_ledger(owner, |ledger| ledger.request_withdrawal(id, request, now))
            .await?;
        tracing::info!(?owner, transaction_id = %transaction.id, amount = %transaction.amount, "Withdrawal requested");
        Ok(transaction)
    }

    /// Credit a ledger from an external payment method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Wallet` when the request is invalid.
    pub async fn top_up(
        &self,
        owner: &WalletOwner,
        request: &TransferRequest,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError> {
        let id = TransactionId::new(self.store.next_id("TXN-"));
        Ok(self
            .with_ledger(owner, |ledger| ledger.top_up(id, request, now))
            .await?)
    }

    /// Pay for an order from a ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Wallet` when the balance does not cover
    /// `amount`.
    pub async fn pay(
        &self,
        owner: &WalletOwner,
        amount: Price,
        description: String,
        order_id: Option<OrderId>,
        now: DateTime<Utc>,
    ) -> Result<Transaction, RepositoryError> {
        let id = TransactionId::new(self.store.next_id("TXN-"));
        Ok(self
            .with_ledger(owner, |ledger| ledger.pay(id, amount, description, order_id, now))
            .await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wakalni_core::wallet::{TransactionStatus, WalletError};

    use super::*;
    use crate::db::tests::store;

    fn request(amount: i64, method: &str) -> TransferRequest {
        TransferRequest {
            amount: Price::from_dinars(amount),
            method: method.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_restaurant_balance_from_fixtures() {
        let store = store();
        let ledger = WalletRepository::new(&store)
            .ledger(&WalletOwner::Restaurant)
            .await;
        // 5000 + 2847.50 - 450 + 89.50 - 120; the pending withdrawal does not count
        assert_eq!(ledger.balance(), Price::from_dinars(7367));
        assert_eq!(ledger.pending_amount(), Price::ZERO - Price::from_dinars(1000));
    }

    #[tokio::test]
    async fn test_withdraw_checks_balance() {
        let store = store();
        let repo = WalletRepository::new(&store);

        let too_much = repo
            .withdraw(&WalletOwner::Restaurant, &request(10_000, "Bank Transfer"), Utc::now())
            .await;
        assert!(matches!(
            too_much,
            Err(RepositoryError::Wallet(WalletError::InsufficientFunds { .. }))
        ));

        let ok = repo
            .withdraw(&WalletOwner::Restaurant, &request(500, "Bank Transfer"), Utc::now())
            .await
            .unwrap();
        assert_eq!(ok.status, TransactionStatus::Pending);
        let ledger = repo.ledger(&WalletOwner::Restaurant).await;
        assert_eq!(ledger.transactions[0].id, ok.id);
    }

    #[tokio::test]
    async fn test_client_wallets_are_separate() {
        let store = store();
        let repo = WalletRepository::new(&store);
        let alice = WalletOwner::Client("alice".to_owned());
        let bob = WalletOwner::Client("bob".to_owned());

        let seed = repo.ledger(&alice).await.balance();
        repo.top_up(&alice, &request(25, "PayPal Account"), Utc::now())
            .await
            .unwrap();

        assert_eq!(repo.ledger(&alice).await.balance(), seed + Price::from_dinars(25));
        assert_eq!(repo.ledger(&bob).await.balance(), seed);
    }

    #[tokio::test]
    async fn test_pay_from_client_wallet() {
        let store = store();
        let repo = WalletRepository::new(&store);
        let guest = WalletOwner::Client("guest".to_owned());

        let paid = repo
            .pay(&guest, Price::from_dinars(50), "Order ORD-9".to_owned(), None, Utc::now())
            .await
            .unwrap();
        assert_eq!(paid.amount, Price::from_dinars(50));

        let broke = repo
            .pay(&guest, Price::from_dinars(1_000_000), "Order ORD-10".to_owned(), None, Utc::now())
            .await;
        assert!(broke.is_err());
    }
}
