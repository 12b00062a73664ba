//! Session middleware configuration.
//!
//! Sessions live in process memory (`tower-sessions` `MemoryStore`), like
//! the rest of the app's state. They hold the cart, the applied promo code,
//! the signed-in identity and flash messages.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::WakalniConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "wakalni_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the in-memory session layer.
///
/// The cookie is HTTP-only, `SameSite=Lax`, and `Secure` when the public
/// base URL is HTTPS.
#[must_use]
pub fn create_session_layer(config: &WakalniConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
