//! In-memory data store.
//!
//! Every page of the platform reads from and writes to this store. It is
//! seeded at startup from the JSON fixtures under `crates/web/data/` (or
//! overrides in `WAKALNI_DATA_DIR`) and lives for the lifetime of the
//! process; nothing is persisted.
//!
//! ## Collections
//!
//! - `restaurants`, `menu` - Catalog browsed by consumers
//! - `orders` - Kitchen board of the admin restaurant
//! - `inventory` - Stock room of the admin restaurant
//! - `promotions` - Platform promotion codes
//! - `customers`, `admins` - Accounts managed by the superadmin
//! - wallets - Restaurant, platform and per-visitor client ledgers
//! - `drivers`, `deliveries` - Live tracking board (read-only)
//! - `charts` - Canned revenue series for the statistics tabs
//!
//! Access goes through the repositories in the submodules, one per area,
//! each borrowing the store for the duration of one call.

pub mod accounts;
pub mod catalog;
pub mod fixtures;
pub mod inventory;
pub mod orders;
pub mod promotions;
pub mod wallets;

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::RwLock;

use wakalni_core::StatusTransitionError;
use wakalni_core::accounts::{Customer, Delivery, Driver, RestaurantAdmin};
use wakalni_core::catalog::{MenuItem, MenuItemDraftError, Restaurant, SelectionError};
use wakalni_core::inventory::{InventoryError, InventoryItem};
use wakalni_core::orders::Order;
use wakalni_core::promo::{Promotion, PromotionDraftError};
use wakalni_core::wallet::{Ledger, WalletError};

pub use accounts::AccountRepository;
pub use catalog::CatalogRepository;
pub use fixtures::{Charts, FixtureError, WalletOptions};
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;
pub use promotions::PromotionRepository;
pub use wallets::{WalletOwner, WalletRepository};

/// First number handed out for generated ids; above every fixture id.
const FIRST_GENERATED_ID: u64 = 1248;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Status change the workflow does not allow.
    #[error(transparent)]
    Transition(#[from] StatusTransitionError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Promotion(#[from] PromotionDraftError),

    #[error(transparent)]
    MenuItem(#[from] MenuItemDraftError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl RepositoryError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the error is about the submitted input rather than the
    /// state of the store; forms show these as a flash message.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::Wallet(_)
                | Self::Inventory(_)
                | Self::Promotion(_)
                | Self::MenuItem(_)
                | Self::Selection(_)
        )
    }
}

/// Shared, lock-protected application data.
pub struct Store {
    restaurants: RwLock<Vec<Restaurant>>,
    menu: RwLock<Vec<MenuItem>>,
    orders: RwLock<Vec<Order>>,
    inventory: RwLock<Vec<InventoryItem>>,
    promotions: RwLock<Vec<Promotion>>,
    customers: RwLock<Vec<Customer>>,
    admins: RwLock<Vec<RestaurantAdmin>>,
    restaurant_wallet: RwLock<Ledger>,
    platform_wallet: RwLock<Ledger>,
    /// Client ledgers keyed by user id (`guest` for anonymous visitors).
    client_wallets: RwLock<HashMap<String, Ledger>>,
    /// Ledger every new client wallet starts from.
    client_wallet_seed: Ledger,
    wallet_options: WalletOptions,
    drivers: Vec<Driver>,
    deliveries: Vec<Delivery>,
    charts: Charts,
    sequence: AtomicU64,
}

impl Store {
    /// Load fixtures and build the store.
    ///
    /// Files found in `data_dir` replace the embedded fixtures of the same
    /// name.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError` if an override cannot be read or any fixture
    /// fails to parse.
    pub fn load(data_dir: Option<&Path>) -> Result<Self, FixtureError> {
        let fixtures = fixtures::Fixtures::load(data_dir)?;
        let now = chrono::Utc::now();
        let drivers = fixtures::random_drivers(&fixtures.charts.driver_names, 12, &mut rand::rng());

        tracing::info!(
            restaurants = fixtures.restaurants.len(),
            menu_items = fixtures.menu.len(),
            orders = fixtures.orders.len(),
            promotions = fixtures.promotions.len(),
            "Loaded fixtures"
        );

        Ok(Self {
            restaurants: RwLock::new(fixtures.restaurants),
            menu: RwLock::new(fixtures.menu),
            orders: RwLock::new(fixtures.orders.into_iter().map(|o| o.into_order(now)).collect()),
            inventory: RwLock::new(fixtures.inventory),
            promotions: RwLock::new(fixtures.promotions),
            customers: RwLock::new(fixtures.customers),
            admins: RwLock::new(fixtures.admins),
            restaurant_wallet: RwLock::new(fixtures.wallets.restaurant.into_ledger(now)),
            platform_wallet: RwLock::new(fixtures.wallets.platform.into_ledger(now)),
            client_wallets: RwLock::new(HashMap::new()),
            client_wallet_seed: fixtures.wallets.client.into_ledger(now),
            wallet_options: fixtures.wallets.options,
            drivers,
            deliveries: fixtures.deliveries,
            charts: fixtures.charts,
            sequence: AtomicU64::new(FIRST_GENERATED_ID),
        })
    }

    /// Next generated id with `prefix`, e.g. `ORD-1248`.
    pub(crate) fn next_id(&self, prefix: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}{n}")
    }

    /// Drivers on the tracking board, generated at startup.
    #[must_use]
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Deliveries on the tracking list.
    #[must_use]
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Canned chart series.
    #[must_use]
    pub const fn charts(&self) -> &Charts {
        &self.charts
    }

    /// Payment methods and quick amounts offered by the client wallet.
    #[must_use]
    pub const fn wallet_options(&self) -> &WalletOptions {
        &self.wallet_options
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A store seeded from the embedded fixtures.
    pub(crate) fn store() -> Store {
        Store::load(None).unwrap()
    }

    #[test]
    fn test_load_embedded_fixtures() {
        let store = store();
        assert_eq!(store.drivers().len(), 12);
        assert_eq!(store.deliveries().len(), 6);
        assert_eq!(store.charts().daily.len(), 7);
        assert_eq!(store.wallet_options().quick_amounts.len(), 4);
    }

    #[test]
    fn test_next_id_is_unique() {
        let store = store();
        let a = store.next_id("ORD-");
        let b = store.next_id("ORD-");
        assert_eq!(a, "ORD-1248");
        assert_ne!(a, b);
    }

    #[test]
    fn test_not_found_message() {
        let err = RepositoryError::not_found("order", "ORD-1");
        assert_eq!(err.to_string(), "order ORD-1 not found");
        assert!(!err.is_invalid_input());
        assert!(RepositoryError::from(WalletError::MissingMethod).is_invalid_input());
    }
}
