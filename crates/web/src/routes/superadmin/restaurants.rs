//! Restaurants tab: approvals and suspensions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::accounts::AccountQuery;
use wakalni_core::catalog::Restaurant;
use wakalni_core::{RestaurantAction, RestaurantId, RestaurantStatus};

use super::{ActionForm, SuperFrame, SuperTab};
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{ListQuery, redirect_with};
use crate::state::AppState;

/// Restaurants per status, for the filter chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestaurantCounts {
    pub pending: usize,
    pub active: usize,
    pub suspended: usize,
    pub rejected: usize,
}

impl RestaurantCounts {
    #[must_use]
    pub fn of(restaurants: &[Restaurant]) -> Self {
        let mut counts = Self::default();
        for restaurant in restaurants {
            match restaurant.status {
                RestaurantStatus::Pending => counts.pending += 1,
                RestaurantStatus::Active => counts.active += 1,
                RestaurantStatus::Suspended => counts.suspended += 1,
                RestaurantStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/restaurants.html")]
pub struct RestaurantsTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub restaurants: Vec<Restaurant>,
    pub counts: RestaurantCounts,
    pub statuses: &'static [RestaurantStatus],
    pub query: ListQuery,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: SuperFrame,
    query: ListQuery,
) -> RestaurantsTemplate {
    let catalog = CatalogRepository::new(state.store());
    let filter = AccountQuery {
        q: query.q.clone(),
        status: query.status.clone(),
    };

    RestaurantsTemplate {
        restaurants: catalog.search(&filter).await,
        counts: RestaurantCounts::of(&catalog.all().await),
        statuses: &RestaurantStatus::ALL,
        ctx,
        frame,
        query,
    }
}

/// Approve, reject, suspend or reactivate a restaurant.
///
/// # Errors
///
/// Returns `NotFound` for an unknown restaurant and a conflict when the
/// action does not apply to its status.
#[instrument(skip(state, session))]
pub async fn set_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<RestaurantId>,
    Form(form): Form<ActionForm<RestaurantAction>>,
) -> Result<Redirect> {
    let restaurant = CatalogRepository::new(state.store())
        .apply_action(&id, form.action)
        .await?;
    tracing::info!(restaurant_id = %restaurant.id, status = restaurant.status.as_str(), "Restaurant status changed");

    let flash = Flash::success(format!(
        "{} is now {}",
        restaurant.name,
        restaurant.status.as_str()
    ));
    redirect_with(&session, SuperTab::Restaurants.path(), flash).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_from_fixtures() {
        let store = crate::db::tests::store();
        let restaurants = CatalogRepository::new(&store).all().await;
        let counts = RestaurantCounts::of(&restaurants);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.suspended, 1);
        assert_eq!(counts.active, 5);
        assert_eq!(counts.rejected, 0);
    }
}
