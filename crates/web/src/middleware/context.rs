//! Per-request page context read from the session.
//!
//! Every full page renders the header (signed-in user, cart badge) and a
//! one-shot flash toast. `PageContext` collects those in one extractor; the
//! helpers below are the only code that touches the cart and flash keys.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use wakalni_core::cart::Cart;

use crate::error::AppError;
use crate::models::{CurrentUser, Flash, session_keys};

/// Header and toast data shared by every page template.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub cart_count: u64,
    /// Taken from the session, so it renders once.
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Display name for the header, or `None` when signed out.
    #[must_use]
    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.name.as_str())
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        let cart_count = load_cart(&session).await?.total_items();
        let flash = session.remove::<Flash>(session_keys::FLASH).await?;

        Ok(Self {
            user,
            cart_count,
            flash,
        })
    }
}

/// The visitor's cart; empty when none was saved yet.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Persist the visitor's cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Queue a toast for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, flash).await
}
