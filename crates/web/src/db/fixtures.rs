//! Seed data for the in-memory store.
//!
//! Fixtures are JSON files embedded at compile time. Timestamps are stored
//! relative to startup (`minutes_ago`, `hours_ago`) so the dashboards always
//! show fresh activity.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use wakalni_core::accounts::{Customer, Delivery, Driver, RestaurantAdmin};
use wakalni_core::catalog::{MenuItem, Restaurant};
use wakalni_core::inventory::InventoryItem;
use wakalni_core::orders::{Order, OrderLine};
use wakalni_core::promo::Promotion;
use wakalni_core::stats::SeriesPoint;
use wakalni_core::wallet::{Ledger, Transaction, TransactionKind, TransactionStatus};
use wakalni_core::{DriverId, DriverStatus, OrderId, OrderStatus, OrderType, Price, TransactionId};

const RESTAURANTS: &str = include_str!("../../data/restaurants.json");
const MENU_ITEMS: &str = include_str!("../../data/menu_items.json");
const ORDERS: &str = include_str!("../../data/orders.json");
const INVENTORY: &str = include_str!("../../data/inventory.json");
const PROMOTIONS: &str = include_str!("../../data/promotions.json");
const CUSTOMERS: &str = include_str!("../../data/customers.json");
const ADMINS: &str = include_str!("../../data/admins.json");
const WALLETS: &str = include_str!("../../data/wallets.json");
const DELIVERIES: &str = include_str!("../../data/deliveries.json");
const CHARTS: &str = include_str!("../../data/charts.json");

/// Errors loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid fixture {file}: {source}")]
    Parse {
        file: &'static str,
        source: serde_json::Error,
    },
    #[error("menu id '{id}' contains one of {separators:?}", separators = wakalni_core::cart::LINE_ID_SEPARATORS)]
    MenuId { id: String },
}

/// Chart series shown on the statistics tabs.
#[derive(Debug, Clone, Deserialize)]
pub struct Charts {
    pub daily: Vec<SeriesPoint>,
    pub weekly: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
    pub peak_hours: Vec<SeriesPoint>,
    pub platform_monthly: Vec<SeriesPoint>,
    pub driver_names: Vec<String>,
}

/// Choices offered by the client wallet forms.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletOptions {
    pub payment_methods: Vec<String>,
    pub quick_amounts: Vec<Price>,
}

/// Order with a creation time relative to startup.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderFixture {
    id: OrderId,
    customer_name: String,
    customer_phone: String,
    #[serde(default)]
    customer_address: Option<String>,
    items: Vec<OrderLine>,
    total: Price,
    status: OrderStatus,
    order_type: OrderType,
    minutes_ago: i64,
    #[serde(default)]
    estimated_minutes: Option<u32>,
    #[serde(default)]
    table_number: Option<String>,
}

impl OrderFixture {
    pub(crate) fn into_order(self, now: DateTime<Utc>) -> Order {
        Order {
            id: self.id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            items: self.items,
            total: self.total,
            status: self.status,
            order_type: self.order_type,
            created_at: now - Duration::minutes(self.minutes_ago),
            estimated_minutes: self.estimated_minutes,
            table_number: self.table_number,
        }
    }
}

/// Transaction with a date relative to startup.
#[derive(Debug, Deserialize)]
struct TransactionFixture {
    id: TransactionId,
    kind: TransactionKind,
    amount: Price,
    description: String,
    category: String,
    hours_ago: i64,
    status: TransactionStatus,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    order_id: Option<OrderId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LedgerFixture {
    opening_balance: Price,
    transactions: Vec<TransactionFixture>,
}

impl LedgerFixture {
    pub(crate) fn into_ledger(self, now: DateTime<Utc>) -> Ledger {
        let transactions = self
            .transactions
            .into_iter()
            .map(|t| Transaction {
                id: t.id,
                kind: t.kind,
                amount: t.amount,
                description: t.description,
                category: t.category,
                date: now - Duration::hours(t.hours_ago),
                status: t.status,
                payment_method: t.payment_method,
                order_id: t.order_id,
            })
            .collect();
        Ledger {
            opening_balance: self.opening_balance,
            transactions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WalletsFixture {
    pub(crate) restaurant: LedgerFixture,
    pub(crate) client: LedgerFixture,
    pub(crate) platform: LedgerFixture,
    #[serde(flatten)]
    pub(crate) options: WalletOptions,
}

/// Everything the store is seeded with.
pub(crate) struct Fixtures {
    pub(crate) restaurants: Vec<Restaurant>,
    pub(crate) menu: Vec<MenuItem>,
    pub(crate) orders: Vec<OrderFixture>,
    pub(crate) inventory: Vec<InventoryItem>,
    pub(crate) promotions: Vec<Promotion>,
    pub(crate) customers: Vec<Customer>,
    pub(crate) admins: Vec<RestaurantAdmin>,
    pub(crate) wallets: WalletsFixture,
    pub(crate) deliveries: Vec<Delivery>,
    pub(crate) charts: Charts,
}

impl Fixtures {
    pub(crate) fn load(dir: Option<&Path>) -> Result<Self, FixtureError> {
        let menu: Vec<MenuItem> = read(dir, "menu_items.json", MENU_ITEMS)?;
        if let Some(id) = menu.iter().find_map(MenuItem::unsafe_line_id) {
            return Err(FixtureError::MenuId { id: id.to_owned() });
        }

        Ok(Self {
            restaurants: read(dir, "restaurants.json", RESTAURANTS)?,
            menu,
            orders: read(dir, "orders.json", ORDERS)?,
            inventory: read(dir, "inventory.json", INVENTORY)?,
            promotions: read(dir, "promotions.json", PROMOTIONS)?,
            customers: read(dir, "customers.json", CUSTOMERS)?,
            admins: read(dir, "admins.json", ADMINS)?,
            wallets: read(dir, "wallets.json", WALLETS)?,
            deliveries: read(dir, "deliveries.json", DELIVERIES)?,
            charts: read(dir, "charts.json", CHARTS)?,
        })
    }
}

/// Parse `file` from `dir` when it exists there, else the embedded copy.
fn read<T: DeserializeOwned>(
    dir: Option<&Path>,
    file: &'static str,
    embedded: &str,
) -> Result<T, FixtureError> {
    let override_path = dir.map(|d| d.join(file)).filter(|path| path.is_file());
    let parsed = match override_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using fixture override");
            let raw = std::fs::read_to_string(&path)
                .map_err(|source| FixtureError::Io { path, source })?;
            serde_json::from_str(&raw)
        }
        None => serde_json::from_str(embedded),
    };
    parsed.map_err(|source| FixtureError::Parse { file, source })
}

/// Build `count` drivers with random names, statuses and ratings.
pub fn random_drivers(names: &[String], count: usize, rng: &mut impl Rng) -> Vec<Driver> {
    (1..=count)
        .map(|n| Driver {
            id: DriverId::new(n.to_string()),
            name: names
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| format!("Driver {n}")),
            image: "/static/img/driver.svg".to_owned(),
            status: DriverStatus::ALL
                .choose(rng)
                .copied()
                .unwrap_or(DriverStatus::Available),
            rating: rng.random_range(1..=5),
        })
        .collect()
}
