//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;
use wakalni_core::catalog::{Restaurant, RestaurantQuery};

use super::recipes::{CUISINES, CuisineChip};
use crate::db::CatalogRepository;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Restaurants highlighted on the landing page.
const FEATURED_COUNT: usize = 3;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub featured: Vec<Restaurant>,
    pub cuisines: &'static [CuisineChip],
}

/// Best rated open restaurants.
fn featured(mut restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    restaurants.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    restaurants.truncate(FEATURED_COUNT);
    restaurants
}

/// Display the landing page.
#[instrument(skip(state, ctx))]
pub async fn index(State(state): State<AppState>, ctx: PageContext) -> impl IntoResponse {
    let restaurants = CatalogRepository::new(state.store())
        .browse(&RestaurantQuery::default())
        .await;

    HomeTemplate {
        ctx,
        featured: featured(restaurants),
        cuisines: &CUISINES,
    }
}
