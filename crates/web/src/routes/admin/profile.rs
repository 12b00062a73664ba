//! Restaurant profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;
use wakalni_core::accounts::{AccountQuery, RestaurantAdmin};
use wakalni_core::catalog::Restaurant;

use crate::db::{AccountRepository, CatalogRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "admin/profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub restaurant: Restaurant,
    /// Staff accounts attached to the restaurant.
    pub staff: Vec<RestaurantAdmin>,
    pub menu_items: usize,
}

/// Display the managed restaurant's profile.
///
/// # Errors
///
/// Returns `NotFound` if the configured restaurant does not exist.
#[instrument(skip(state, ctx))]
pub async fn show(State(state): State<AppState>, ctx: PageContext) -> Result<ProfileTemplate> {
    let catalog = CatalogRepository::new(state.store());
    let restaurant = catalog.get(&state.config().admin_restaurant_id).await?;
    let menu_items = catalog.menu(&restaurant.id).await.len();
    let staff = AccountRepository::new(state.store())
        .admins(&AccountQuery::default())
        .await
        .into_iter()
        .filter(|admin| admin.restaurant == restaurant.name)
        .collect();

    Ok(ProfileTemplate {
        ctx,
        restaurant,
        staff,
        menu_items,
    })
}
