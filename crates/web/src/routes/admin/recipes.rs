//! Recipes tab: the restaurant's menu.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::MenuItemId;
use wakalni_core::catalog::{Ingredient, MenuItemDraft, group_by_category};

use super::{AdminFrame, AdminTab};
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::restaurant::MenuSection;
use crate::routes::{outcome, parse_price, redirect_with};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "admin/recipes.html")]
pub struct RecipesTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub sections: Vec<MenuSection>,
}

/// New recipe form. Ingredients come one per line as `name, quantity, unit`.
#[derive(Debug, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub prep_minutes: String,
    #[serde(default)]
    pub ingredients: String,
}

impl RecipeForm {
    /// Parse the numeric fields and the ingredient lines.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when a number or an ingredient line is malformed.
    pub fn into_draft(self) -> Result<MenuItemDraft> {
        let prep_minutes = match self.prep_minutes.trim() {
            "" => None,
            text => Some(text.parse::<u32>().map_err(|_| {
                AppError::BadRequest("prep_minutes must be a whole number".to_string())
            })?),
        };

        Ok(MenuItemDraft {
            price: parse_price("price", &self.price)?,
            prep_minutes,
            ingredients: parse_ingredients(&self.ingredients)?,
            name: self.name,
            category: self.category,
            description: self.description,
        })
    }
}

/// Parse `name, quantity, unit` lines; blank lines are skipped.
fn parse_ingredients(text: &str) -> Result<Vec<Ingredient>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            let [name, quantity, unit] = parts.as_slice() else {
                return Err(AppError::BadRequest(format!(
                    "ingredient \"{line}\" must be: name, quantity, unit"
                )));
            };
            let quantity = quantity.parse::<f64>().map_err(|_| {
                AppError::BadRequest(format!("ingredient \"{name}\" has an invalid quantity"))
            })?;
            Ok(Ingredient {
                name: (*name).to_owned(),
                quantity,
                unit: (*unit).to_owned(),
            })
        })
        .collect()
}

pub(super) async fn page(state: &AppState, ctx: PageContext, frame: AdminFrame) -> RecipesTemplate {
    let menu = CatalogRepository::new(state.store())
        .menu(&frame.restaurant.id)
        .await;
    let sections = group_by_category(&menu)
        .into_iter()
        .map(|(name, items)| MenuSection {
            name,
            items: items.into_iter().cloned().collect(),
        })
        .collect();

    RecipesTemplate {
        ctx,
        frame,
        sections,
    }
}

/// Add a recipe to the menu.
///
/// # Errors
///
/// Returns `BadRequest` for malformed numbers, or an error if the session
/// store fails.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect> {
    let draft = form.into_draft()?;
    let result = CatalogRepository::new(state.store())
        .create_menu_item(&state.config().admin_restaurant_id, draft)
        .await;
    let flash = outcome(result, |item| format!("{} added to the menu", item.name))?;
    redirect_with(&session, AdminTab::Recipes.path(), flash).await
}

/// Flip a recipe between available and unavailable.
///
/// # Errors
///
/// Returns `NotFound` when the restaurant has no such recipe.
#[instrument(skip(state, session))]
pub async fn toggle_availability(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MenuItemId>,
) -> Result<Redirect> {
    let available = CatalogRepository::new(state.store())
        .toggle_availability(&state.config().admin_restaurant_id, &id)
        .await?;
    let flash = Flash::success(if available {
        "Recipe is available again"
    } else {
        "Recipe marked unavailable"
    });
    redirect_with(&session, AdminTab::Recipes.path(), flash).await
}

/// Remove a recipe from the menu.
///
/// # Errors
///
/// Returns `NotFound` when the restaurant has no such recipe.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<MenuItemId>,
) -> Result<Redirect> {
    CatalogRepository::new(state.store())
        .delete_menu_item(&state.config().admin_restaurant_id, &id)
        .await?;
    tracing::info!(menu_item_id = %id, "Recipe deleted");
    redirect_with(&session, AdminTab::Recipes.path(), Flash::success("Recipe deleted")).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wakalni_core::Price;

    use super::*;

    fn form(price: &str, ingredients: &str) -> RecipeForm {
        RecipeForm {
            name: "Chorba".to_owned(),
            category: "Soups".to_owned(),
            description: String::new(),
            price: price.to_owned(),
            prep_minutes: "25".to_owned(),
            ingredients: ingredients.to_owned(),
        }
    }

    #[test]
    fn test_into_draft_parses_numbers_and_ingredients() {
        let draft = form("450", "Lamb, 0.2, kg\n\n Frik , 50, g ")
            .into_draft()
            .unwrap();
        assert_eq!(draft.price, Some(Price::from_dinars(450)));
        assert_eq!(draft.prep_minutes, Some(25));
        assert_eq!(draft.ingredients.len(), 2);
        assert_eq!(draft.ingredients[1].name, "Frik");
        assert_eq!(draft.ingredients[1].unit, "g");
    }

    #[test]
    fn test_blank_price_is_left_to_validation() {
        let draft = form("", "").into_draft().unwrap();
        assert_eq!(draft.price, None);
        assert!(draft.ingredients.is_empty());
    }

    #[test]
    fn test_malformed_ingredient_is_rejected() {
        assert!(matches!(
            form("450", "Lamb 0.2 kg").into_draft(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            form("450", "Lamb, lots, kg").into_draft(),
            Err(AppError::BadRequest(_))
        ));
    }
}
