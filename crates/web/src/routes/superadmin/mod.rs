//! Superadmin portal.
//!
//! Platform-wide management: restaurant approvals, customer and staff
//! accounts, promotion codes, platform statistics and the commission wallet.

pub mod overview;
pub mod promotions;
pub mod restaurants;
pub mod statistics;
pub mod users;
pub mod wallet;

use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use crate::middleware::PageContext;
use crate::routes::ListQuery;
use crate::state::AppState;

/// Portal tabs, in navigation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuperTab {
    #[default]
    Overview,
    Restaurants,
    Users,
    Promotions,
    Statistics,
    Wallet,
}

impl SuperTab {
    pub const ALL: [Self; 6] = [
        Self::Overview,
        Self::Restaurants,
        Self::Users,
        Self::Promotions,
        Self::Statistics,
        Self::Wallet,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Restaurants => "restaurants",
            Self::Users => "users",
            Self::Promotions => "promotions",
            Self::Statistics => "statistics",
            Self::Wallet => "wallet",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Restaurants => "Restaurants",
            Self::Users => "Users",
            Self::Promotions => "Promotions",
            Self::Statistics => "Statistics",
            Self::Wallet => "Wallet",
        }
    }

    /// Dashboard URL of this tab, where its forms redirect.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Overview => "/superadmin/dashboard",
            Self::Restaurants => "/superadmin/dashboard?tab=restaurants",
            Self::Users => "/superadmin/dashboard?tab=users",
            Self::Promotions => "/superadmin/dashboard?tab=promotions",
            Self::Statistics => "/superadmin/dashboard?tab=statistics",
            Self::Wallet => "/superadmin/dashboard?tab=wallet",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: SuperTab,
}

/// Tab bar shared by every portal tab.
#[derive(Debug, Clone, Copy)]
pub struct SuperFrame {
    pub active: SuperTab,
    pub tabs: &'static [SuperTab],
}

impl SuperFrame {
    #[must_use]
    pub const fn new(active: SuperTab) -> Self {
        Self {
            active,
            tabs: &SuperTab::ALL,
        }
    }

    #[must_use]
    pub fn is_active(&self, tab: &SuperTab) -> bool {
        self.active == *tab
    }
}

/// A status action submitted from a row button.
#[derive(Debug, Deserialize)]
pub struct ActionForm<A> {
    pub action: A,
}

/// Create the superadmin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/restaurants/{id}/status", post(restaurants::set_status))
        .route("/customers/{id}/status", post(users::set_customer_status))
        .route("/admins/{id}/status", post(users::set_admin_status))
        .route("/promotions", post(promotions::create))
        .route("/promotions/{id}/toggle", post(promotions::toggle))
        .route("/wallet/withdraw", post(wallet::withdraw))
}

/// Render the selected portal tab.
#[instrument(skip(state, ctx, query), fields(tab = tab.as_str()))]
pub async fn dashboard(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(TabQuery { tab }): Query<TabQuery>,
    Query(query): Query<ListQuery>,
) -> Response {
    let frame = SuperFrame::new(tab);
    match tab {
        SuperTab::Overview => overview::page(&state, ctx, frame).await.into_response(),
        SuperTab::Restaurants => restaurants::page(&state, ctx, frame, query).await.into_response(),
        SuperTab::Users => users::page(&state, ctx, frame, query).await.into_response(),
        SuperTab::Promotions => promotions::page(&state, ctx, frame).await.into_response(),
        SuperTab::Statistics => statistics::page(&state, ctx, frame).into_response(),
        SuperTab::Wallet => wallet::page(&state, ctx, frame, query).await.into_response(),
    }
}
