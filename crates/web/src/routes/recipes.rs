//! Restaurant browsing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;
use wakalni_core::catalog::{Restaurant, RestaurantQuery};

use crate::db::CatalogRepository;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// A cuisine filter chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuisineChip {
    /// Query value, matched against the restaurant's cuisine label.
    pub id: &'static str,
    pub label: &'static str,
}

/// Chips shown above the restaurant grid.
pub const CUISINES: [CuisineChip; 7] = [
    CuisineChip { id: "all", label: "All" },
    CuisineChip { id: "pizza", label: "Pizza" },
    CuisineChip { id: "grill", label: "Grill" },
    CuisineChip { id: "traditional", label: "Traditional" },
    CuisineChip { id: "desserts", label: "Desserts" },
    CuisineChip { id: "coffee", label: "Coffee" },
    CuisineChip { id: "burgers", label: "Burgers" },
];

/// Restaurant browsing template.
#[derive(Template, WebTemplate)]
#[template(path = "recipes.html")]
pub struct RecipesTemplate {
    pub ctx: PageContext,
    pub restaurants: Vec<Restaurant>,
    pub cuisines: &'static [CuisineChip],
    pub q: String,
    pub category: String,
}

/// Display open restaurants matching the search box and cuisine chip.
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<RestaurantQuery>,
) -> impl IntoResponse {
    let restaurants = CatalogRepository::new(state.store()).browse(&query).await;

    RecipesTemplate {
        ctx,
        restaurants,
        cuisines: &CUISINES,
        q: query.q.unwrap_or_default(),
        category: query.category.unwrap_or_else(|| "all".to_owned()),
    }
}
