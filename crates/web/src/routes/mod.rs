//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Landing page
//! GET  /recipes?q=&category=             - Restaurant browsing
//! GET  /restaurant/{id}?category=        - Restaurant menu
//!
//! # Cart
//! POST /cart/add                         - Add a line (item, quantity, supplements)
//! POST /cart/update                      - Set a line's quantity (<= 0 removes)
//! POST /cart/remove                      - Remove a line
//! POST /cart/clear                       - Empty the cart
//! GET  /cart/count                       - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout?mode=                   - Summary, promo, delivery and payment
//! POST /checkout                         - Simulated placement, confirmation page
//! POST /checkout/promo                   - Apply a promo code
//! POST /checkout/promo/remove            - Drop the applied promo code
//!
//! # Consumer profile
//! GET  /profile                          - Profile and client wallet
//! POST /profile/wallet/top-up            - Wallet top-up
//!
//! # Auth (rate limited)
//! GET  /auth/login?mode=                 - Login / signup page
//! POST /auth/login                       - Login
//! POST /auth/register                    - Signup
//! POST /auth/send-otp                    - Request a one-time password
//! POST /auth/logout                      - Sign out
//!
//! # Restaurant admin
//! GET  /admin/dashboard?tab=             - overview|recipes|inventory|orders|wallet|statistics|tracking
//! GET  /admin/profile                    - Restaurant profile
//! POST /admin/orders/{id}/status
//! POST /admin/recipes
//! POST /admin/recipes/{id}/availability
//! POST /admin/recipes/{id}/delete
//! POST /admin/inventory
//! POST /admin/inventory/{id}/stock
//! POST /admin/inventory/{id}/delete
//! POST /admin/wallet/withdraw
//!
//! # Superadmin
//! GET  /superadmin/dashboard?tab=        - overview|restaurants|users|promotions|statistics|wallet
//! POST /superadmin/restaurants/{id}/status
//! POST /superadmin/customers/{id}/status
//! POST /superadmin/admins/{id}/status
//! POST /superadmin/promotions
//! POST /superadmin/promotions/{id}/toggle
//! POST /superadmin/wallet/withdraw
//!
//! # JSON API (rate limited)
//! POST /api/promotions/validate          - Promo code validation
//! POST /api/chat                         - Chat assistant widget
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod profile;
pub mod recipes;
pub mod restaurant;
pub mod superadmin;

use std::str::FromStr;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use wakalni_core::Price;
use wakalni_core::wallet::TransferRequest;

use crate::db::{RepositoryError, WalletOwner, WalletRepository};
use crate::error::{AppError, Result};
use crate::middleware::{api_rate_limiter, auth_rate_limiter, set_flash};
use crate::models::Flash;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", post(auth::register))
        .route("/send-otp", post(auth::send_otp))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/promotions/validate", post(api::promotions::validate))
        .route("/chat", post(api::chat::reply))
        .layer(api_rate_limiter())
}

/// Create all routes for the web app.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/recipes", get(recipes::index))
        .route("/restaurant/{id}", get(restaurant::show))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place))
        .route("/checkout/promo", post(checkout::apply_promo))
        .route("/checkout/promo/remove", post(checkout::remove_promo))
        .route("/profile", get(profile::show))
        .route("/profile/wallet/top-up", post(profile::top_up))
        .nest("/auth", auth_routes())
        .nest("/admin", admin::routes())
        .nest("/superadmin", superadmin::routes())
        .nest("/api", api_routes())
}

// =============================================================================
// Form helpers
// =============================================================================

/// Flash `flash` and redirect (303) to `to`.
pub(crate) async fn redirect_with(session: &Session, to: &str, flash: Flash) -> Result<Redirect> {
    set_flash(session, flash).await?;
    Ok(Redirect::to(to))
}

/// Turn the outcome of a form action into a flash message.
///
/// Input errors become an error toast; anything else (unknown ids, illegal
/// transitions) is returned as an `AppError`.
pub(crate) fn outcome<T>(
    result: std::result::Result<T, RepositoryError>,
    success: impl FnOnce(T) -> String,
) -> Result<Flash> {
    match result {
        Ok(value) => Ok(Flash::success(success(value))),
        Err(err) if err.is_invalid_input() => Ok(Flash::error(err.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// Parse an optional numeric form field; blank means absent.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming `field` when the text is not a number
/// or its magnitude is above [`Price::MAX`].
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<Option<Decimal>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let number = Decimal::from_str(value)
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number")))?;
    if number.abs() > Price::MAX.amount() {
        return Err(AppError::BadRequest(format!(
            "{field} cannot exceed {}",
            Price::MAX.amount()
        )));
    }
    Ok(Some(number))
}

/// Parse an optional amount form field; blank means absent.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming `field` when the text is not a number
/// or is out of range.
pub(crate) fn parse_price(field: &str, value: &str) -> Result<Option<Price>> {
    Ok(parse_decimal(field, value)?.map(Price::new))
}

/// Filters of the dashboard lists, echoed back into their forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

impl ListQuery {
    /// Search box value.
    #[must_use]
    pub fn q_text(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or("all")
    }

    #[must_use]
    pub fn kind_text(&self) -> &str {
        self.kind.as_deref().unwrap_or("all")
    }

    #[must_use]
    pub fn category_text(&self) -> &str {
        self.category.as_deref().unwrap_or("all")
    }
}

/// Payout channels offered by the withdrawal forms.
pub const WITHDRAWAL_METHODS: [&str; 3] = ["Bank transfer", "CCP", "BaridiMob"];

/// Withdrawal form data shared by the restaurant and platform wallets.
#[derive(Debug, Deserialize)]
pub struct WithdrawForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub method: String,
}

/// Request a withdrawal from `owner`'s wallet after the simulated delay.
///
/// # Errors
///
/// Returns `BadRequest` when the amount is not a number.
pub(crate) async fn request_withdrawal(
    state: &AppState,
    owner: &WalletOwner,
    form: WithdrawForm,
) -> Result<Flash> {
    let request = TransferRequest {
        amount: parse_price("amount", &form.amount)?.unwrap_or(Price::ZERO),
        method: form.method,
    };
    state.simulate_latency().await;
    let result = WalletRepository::new(state.store())
        .withdraw(owner, &request, chrono::Utc::now())
        .await;
    outcome(result, |transaction| {
        format!("Withdrawal of {} requested", transaction.amount)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wakalni_core::OrderStatus;
    use wakalni_core::wallet::WalletError;

    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("quantity", "  ").unwrap(), None);
        assert_eq!(
            parse_decimal("quantity", "2.5").unwrap(),
            Some(Decimal::new(25, 1))
        );
        assert!(matches!(
            parse_decimal("quantity", "abc"),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            parse_price("amount", "150").unwrap(),
            Some(Price::from_dinars(150))
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range_numbers() {
        assert!(matches!(
            parse_price("amount", "70000000000000000000000000000"),
            Err(AppError::BadRequest(message)) if message == "amount cannot exceed 1000000000"
        ));
        assert!(matches!(
            parse_decimal("quantity", "-1000000001"),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            parse_price("amount", "1000000000").unwrap(),
            Some(Price::MAX)
        );
    }

    #[test]
    fn test_list_query_defaults() {
        let uri = "/admin/dashboard?tab=orders&status=ready&type=takeout"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<ListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.status_text(), "ready");
        assert_eq!(query.kind_text(), "takeout");
        assert_eq!(query.q_text(), "");
        assert_eq!(query.category_text(), "all");
    }

    #[test]
    fn test_outcome_splits_input_errors() {
        let ok = outcome(Ok::<_, RepositoryError>(3), |n| format!("{n} done")).unwrap();
        assert_eq!(ok, Flash::success("3 done"));

        let invalid = outcome::<()>(Err(WalletError::MissingMethod.into()), |()| String::new());
        assert_eq!(invalid.unwrap().kind, crate::models::FlashKind::Error);

        let transition = OrderStatus::Completed
            .transition_to(OrderStatus::Ready)
            .unwrap_err();
        let conflict = outcome::<()>(Err(transition.into()), |()| String::new());
        assert!(matches!(conflict, Err(AppError::Repository(_))));
    }
}
