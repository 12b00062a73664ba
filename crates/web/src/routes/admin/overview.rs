//! Overview tab: headline numbers and the latest orders.

use askama::Template;
use askama_web::WebTemplate;
use chrono::Utc;
use wakalni_core::Price;
use wakalni_core::inventory::low_stock_count;
use wakalni_core::stats::RestaurantOverview;

use super::AdminFrame;
use super::orders::OrderCard;
use crate::db::{CatalogRepository, InventoryRepository, OrderRepository, WalletOwner, WalletRepository};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Orders listed under the headline cards.
const RECENT_ORDERS: usize = 5;

/// Best sellers listed on the overview.
const TOP_ITEMS: usize = 3;

#[derive(Template, WebTemplate)]
#[template(path = "admin/overview.html")]
pub struct OverviewTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub overview: RestaurantOverview,
    pub recent: Vec<OrderCard>,
    pub balance: Price,
    pub today_income: Price,
    pub low_stock: usize,
    pub menu_items: usize,
}

pub(super) async fn page(state: &AppState, ctx: PageContext, frame: AdminFrame) -> OverviewTemplate {
    let store = state.store();
    let orders = OrderRepository::new(store).all().await;
    let ledger = WalletRepository::new(store)
        .ledger(&WalletOwner::Restaurant)
        .await;
    let inventory = InventoryRepository::new(store).all().await;
    let menu_items = CatalogRepository::new(store)
        .menu(&frame.restaurant.id)
        .await
        .len();
    let now = Utc::now();

    OverviewTemplate {
        overview: RestaurantOverview::compute(&orders, TOP_ITEMS),
        recent: orders
            .into_iter()
            .take(RECENT_ORDERS)
            .map(|order| OrderCard::new(order, now))
            .collect(),
        balance: ledger.balance(),
        today_income: ledger.income_on(now.date_naive()),
        low_stock: low_stock_count(&inventory),
        menu_items,
        ctx,
        frame,
    }
}
