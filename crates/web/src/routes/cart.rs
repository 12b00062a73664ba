//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Forms post here and redirect
//! back (303) with a flash message; prices always come from the menu, never
//! from the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::{LineId, MenuItemId, RestaurantId, SupplementId};

use super::redirect_with;
use crate::db::CatalogRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{load_cart, save_cart};
use crate::models::Flash;
use crate::state::AppState;

/// Where cart edits made on the checkout page return to.
const CHECKOUT_PATH: &str = "/checkout";

/// Parsed add-to-cart form.
///
/// The form repeats `supplement` once per checked box, so it is read from
/// raw pairs rather than a struct.
#[derive(Debug, PartialEq, Eq)]
pub struct AddToCartForm {
    pub restaurant_id: RestaurantId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub supplements: Vec<SupplementId>,
}

impl AddToCartForm {
    /// Parse the submitted pairs. A blank quantity means one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when an id is missing or the quantity
    /// is not a whole number.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut restaurant_id = None;
        let mut menu_item_id = None;
        let mut quantity = 1;
        let mut supplements = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "restaurant_id" => restaurant_id = Some(RestaurantId::new(value)),
                "menu_item_id" => menu_item_id = Some(MenuItemId::new(value)),
                "quantity" if !value.trim().is_empty() => {
                    quantity = value.trim().parse().map_err(|_| {
                        AppError::BadRequest("quantity must be a whole number".to_string())
                    })?;
                }
                "supplement" => supplements.push(SupplementId::new(value)),
                _ => {}
            }
        }

        Ok(Self {
            restaurant_id: restaurant_id
                .ok_or_else(|| AppError::BadRequest("restaurant_id is required".to_string()))?,
            menu_item_id: menu_item_id
                .ok_or_else(|| AppError::BadRequest("menu_item_id is required".to_string()))?,
            quantity,
            supplements,
        })
    }
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: String,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Add a menu item with its supplements to the cart.
///
/// # Errors
///
/// Returns 400 for a malformed form and 404 for an unknown or closed
/// restaurant or dish. An unavailable dish or unknown supplement is reported
/// as a flash message on the menu page.
#[instrument(skip(state, session, pairs))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let form = AddToCartForm::from_pairs(pairs)?;
    let back = format!("/restaurant/{}", form.restaurant_id);

    let item = match CatalogRepository::new(state.store())
        .select(&form.restaurant_id, &form.menu_item_id, &form.supplements)
        .await
    {
        Ok(item) => item,
        Err(err) if err.is_invalid_input() => {
            return redirect_with(&session, &back, Flash::error(err.to_string())).await;
        }
        Err(err) => return Err(err.into()),
    };

    if form.quantity == 0 {
        return Ok(Redirect::to(&back));
    }

    let name = item.name.clone();
    let mut cart = load_cart(&session).await?;
    let line_id = cart.add_item(item, form.quantity);
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("line_id", line_id.as_str())]));
    tracing::debug!(%line_id, quantity = form.quantity, "Cart line added");

    redirect_with(&session, &back, Flash::success(format!("{name} added to cart"))).await
}

/// Set a line's quantity; zero or less removes the line.
///
/// # Errors
///
/// Returns 400 when the quantity is not a whole number.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let quantity: i64 = form
        .quantity
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("quantity must be a whole number".to_string()))?;

    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&LineId::new(form.line_id), quantity);
    save_cart(&session, &cart).await?;
    Ok(Redirect::to(CHECKOUT_PATH))
}

/// Remove a line; unknown lines are ignored.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(&LineId::new(form.line_id));
    save_cart(&session, &cart).await?;
    Ok(Redirect::to(CHECKOUT_PATH))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    redirect_with(&session, CHECKOUT_PATH, Flash::success("Cart cleared")).await
}

/// Cart count badge (fragment).
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: cart.total_items(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_add_form_collects_repeated_supplements() {
        let form = AddToCartForm::from_pairs(pairs(&[
            ("restaurant_id", "1"),
            ("menu_item_id", "1"),
            ("quantity", "2"),
            ("supplement", "olives"),
            ("supplement", "cheese"),
        ]))
        .unwrap();
        assert_eq!(form.quantity, 2);
        assert_eq!(
            form.supplements,
            [SupplementId::new("olives"), SupplementId::new("cheese")]
        );
    }

    #[test]
    fn test_add_form_defaults_quantity() {
        let form = AddToCartForm::from_pairs(pairs(&[
            ("restaurant_id", "1"),
            ("menu_item_id", "3"),
            ("quantity", ""),
        ]))
        .unwrap();
        assert_eq!(form.quantity, 1);
        assert!(form.supplements.is_empty());
    }

    #[test]
    fn test_add_form_rejects_bad_input() {
        assert!(AddToCartForm::from_pairs(pairs(&[("menu_item_id", "1")])).is_err());
        assert!(
            AddToCartForm::from_pairs(pairs(&[
                ("restaurant_id", "1"),
                ("menu_item_id", "1"),
                ("quantity", "-1"),
            ]))
            .is_err()
        );
    }
}
