//! Overview tab: platform headline numbers and pending approvals.

use askama::Template;
use askama_web::WebTemplate;
use wakalni_core::accounts::AccountQuery;
use wakalni_core::catalog::Restaurant;
use wakalni_core::stats::PlatformOverview;
use wakalni_core::{Price, RestaurantStatus};

use super::SuperFrame;
use crate::db::{AccountRepository, CatalogRepository, WalletOwner, WalletRepository};
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Restaurants in the revenue ranking.
const TOP_RESTAURANTS: usize = 5;

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/overview.html")]
pub struct OverviewTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub overview: PlatformOverview,
    pub pending: Vec<Restaurant>,
    pub customers: usize,
    pub wallet_balance: Price,
}

pub(super) async fn page(state: &AppState, ctx: PageContext, frame: SuperFrame) -> OverviewTemplate {
    let store = state.store();
    let restaurants = CatalogRepository::new(store).all().await;
    let customers = AccountRepository::new(store)
        .customers(&AccountQuery::default())
        .await
        .len();
    let wallet_balance = WalletRepository::new(store)
        .ledger(&WalletOwner::Platform)
        .await
        .balance();

    OverviewTemplate {
        overview: PlatformOverview::compute(&restaurants, TOP_RESTAURANTS),
        pending: restaurants
            .into_iter()
            .filter(|r| r.status == RestaurantStatus::Pending)
            .collect(),
        customers,
        wallet_balance,
        ctx,
        frame,
    }
}
