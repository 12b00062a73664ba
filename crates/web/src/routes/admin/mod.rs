//! Restaurant admin dashboard.
//!
//! One page with seven tabs selected by `?tab=`. Every tab manages the
//! restaurant configured as `WAKALNI_ADMIN_RESTAURANT_ID`. Form actions
//! redirect back to their tab with a flash message.

pub mod inventory;
pub mod orders;
pub mod overview;
pub mod profile;
pub mod recipes;
pub mod statistics;
pub mod tracking;
pub mod wallet;

use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use wakalni_core::catalog::Restaurant;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::middleware::PageContext;
use crate::routes::ListQuery;
use crate::state::AppState;

/// Dashboard tabs, in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    #[default]
    Overview,
    Recipes,
    Inventory,
    Orders,
    Wallet,
    Statistics,
    Tracking,
}

impl AdminTab {
    pub const ALL: [Self; 7] = [
        Self::Overview,
        Self::Recipes,
        Self::Inventory,
        Self::Orders,
        Self::Wallet,
        Self::Statistics,
        Self::Tracking,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Recipes => "recipes",
            Self::Inventory => "inventory",
            Self::Orders => "orders",
            Self::Wallet => "wallet",
            Self::Statistics => "statistics",
            Self::Tracking => "tracking",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Recipes => "Recipes",
            Self::Inventory => "Inventory",
            Self::Orders => "Orders",
            Self::Wallet => "Wallet",
            Self::Statistics => "Statistics",
            Self::Tracking => "Tracking",
        }
    }

    /// Dashboard URL of this tab, where its forms redirect.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Overview => "/admin/dashboard",
            Self::Recipes => "/admin/dashboard?tab=recipes",
            Self::Inventory => "/admin/dashboard?tab=inventory",
            Self::Orders => "/admin/dashboard?tab=orders",
            Self::Wallet => "/admin/dashboard?tab=wallet",
            Self::Statistics => "/admin/dashboard?tab=statistics",
            Self::Tracking => "/admin/dashboard?tab=tracking",
        }
    }
}

/// Tab selector of the dashboard.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: AdminTab,
}

/// Header and tab bar shared by every dashboard tab.
#[derive(Debug, Clone)]
pub struct AdminFrame {
    pub restaurant: Restaurant,
    pub active: AdminTab,
    pub tabs: &'static [AdminTab],
}

impl AdminFrame {
    /// Frame for `active`, showing the managed restaurant.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the configured restaurant does not exist.
    pub async fn load(state: &AppState, active: AdminTab) -> Result<Self> {
        let restaurant = CatalogRepository::new(state.store())
            .get(&state.config().admin_restaurant_id)
            .await?;
        Ok(Self {
            restaurant,
            active,
            tabs: &AdminTab::ALL,
        })
    }

    #[must_use]
    pub fn is_active(&self, tab: &AdminTab) -> bool {
        self.active == *tab
    }
}

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile::show))
        .route("/orders/{id}/status", post(orders::set_status))
        .route("/recipes", post(recipes::create))
        .route("/recipes/{id}/availability", post(recipes::toggle_availability))
        .route("/recipes/{id}/delete", post(recipes::delete))
        .route("/inventory", post(inventory::create))
        .route("/inventory/{id}/stock", post(inventory::adjust))
        .route("/inventory/{id}/delete", post(inventory::delete))
        .route("/wallet/withdraw", post(wallet::withdraw))
}

/// Render the selected dashboard tab.
///
/// # Errors
///
/// Returns `NotFound` if the managed restaurant is missing, or an error if
/// the session store fails.
#[instrument(skip(state, ctx, query), fields(tab = tab.as_str()))]
pub async fn dashboard(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(TabQuery { tab }): Query<TabQuery>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let frame = AdminFrame::load(&state, tab).await?;
    Ok(match tab {
        AdminTab::Overview => overview::page(&state, ctx, frame).await.into_response(),
        AdminTab::Recipes => recipes::page(&state, ctx, frame).await.into_response(),
        AdminTab::Inventory => inventory::page(&state, ctx, frame, query).await.into_response(),
        AdminTab::Orders => orders::page(&state, ctx, frame, query).await.into_response(),
        AdminTab::Wallet => wallet::page(&state, ctx, frame, query).await.into_response(),
        AdminTab::Statistics => statistics::page(&state, ctx, frame, &query).await.into_response(),
        AdminTab::Tracking => tracking::page(&state, ctx, frame, query).into_response(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_query_parsing() {
        let uri = "/admin/dashboard?tab=orders&status=ready".parse().unwrap();
        let Query(query) = Query::<TabQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.tab, AdminTab::Orders);

        let uri = "/admin/dashboard?tab=nope".parse().unwrap();
        assert!(Query::<TabQuery>::try_from_uri(&uri).is_err());

        let Query(default) =
            Query::<TabQuery>::try_from_uri(&"/admin/dashboard".parse().unwrap()).unwrap();
        assert_eq!(default.tab, AdminTab::Overview);
    }

    #[test]
    fn test_tab_paths_round_trip_labels() {
        for tab in AdminTab::ALL {
            assert!(tab.path().starts_with("/admin/dashboard"));
            assert!(!tab.label().is_empty());
        }
        assert_eq!(AdminTab::Orders.path(), "/admin/dashboard?tab=orders");
    }
}
