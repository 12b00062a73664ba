//! Restaurant menu page.
//!
//! Lists the menu grouped by category. Each dish carries its own add-to-cart
//! form with a quantity and one checkbox per supplement.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;
use wakalni_core::RestaurantId;
use wakalni_core::catalog::{MenuItem, Restaurant, group_by_category};

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::state::AppState;

/// Category tab selection.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// Dishes of one menu category.
#[derive(Debug, Clone)]
pub struct MenuSection {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Restaurant menu template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurant.html")]
pub struct RestaurantTemplate {
    pub ctx: PageContext,
    pub restaurant: Restaurant,
    /// Every category, for the tab bar.
    pub categories: Vec<String>,
    /// Sections to display: all of them, or the selected tab.
    pub sections: Vec<MenuSection>,
    pub selected: String,
}

/// Group a menu into sections and keep the selected one (`all` keeps every section).
fn sections(menu: &[MenuItem], selected: &str) -> (Vec<String>, Vec<MenuSection>) {
    let groups = group_by_category(menu);
    let categories = groups.iter().map(|(name, _)| name.clone()).collect();
    let sections = groups
        .into_iter()
        .filter(|(name, _)| selected == "all" || name == selected)
        .map(|(name, items)| MenuSection {
            name,
            items: items.into_iter().cloned().collect(),
        })
        .collect();
    (categories, sections)
}

/// Display a restaurant's menu.
///
/// # Errors
///
/// Returns 404 for unknown restaurants and restaurants not taking orders.
#[instrument(skip(state, ctx))]
pub async fn show(
    State(state): State<AppState>,
    ctx: PageContext,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
) -> Result<impl IntoResponse> {
    let catalog = CatalogRepository::new(state.store());
    let id = RestaurantId::new(id);
    let restaurant = catalog.get_open(&id).await?;
    let menu = catalog.menu(&id).await;

    let selected = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "all".to_owned());
    let (categories, sections) = sections(&menu, &selected);

    Ok(RestaurantTemplate {
        ctx,
        restaurant,
        categories,
        sections,
        selected,
    })
}
