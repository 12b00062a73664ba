//! Authentication extractor, session identity helpers and the role guard.
//!
//! `OptionalAuth` reads the signed-in identity from the session.
//! `role_guard_middleware` keeps each role inside its own area (`/recipes`,
//! `/admin/*`, `/superadmin/*`); it is inert unless
//! `WAKALNI_ENFORCE_ROLE_ROUTES` is set.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use wakalni_core::Role;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Login page every guard redirects to.
pub const LOGIN_PATH: &str = "/auth/login";

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Extractor that optionally gets the signed-in user.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the signed-in user in the session.
///
/// The session ID is cycled first so a pre-login ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the signed-in user from the session, e.g. when the backend no
/// longer accepts their token.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

// =============================================================================
// Role guard
// =============================================================================

/// First path segment, e.g. `admin` for `/admin/dashboard`.
fn area(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}

/// Whether the guard applies to `path`.
fn is_guarded(path: &str) -> bool {
    matches!(area(path), "recipes" | "admin" | "superadmin")
}

/// Where to send a visitor of `path`, or `None` to let them through.
///
/// Anonymous visitors go to the login page; signed-in users outside their
/// role's area go to their home route.
#[must_use]
pub fn guard_redirect(path: &str, role: Option<Role>) -> Option<&'static str> {
    if !is_guarded(path) {
        return None;
    }
    match role {
        None => Some(LOGIN_PATH),
        Some(role) if area(role.home_path()) == area(path) => None,
        Some(role) => Some(role.home_path()),
    }
}

/// Middleware enforcing `guard_redirect` when the role guard is enabled.
pub async fn role_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config().enforce_role_routes {
        return next.run(request).await;
    }

    let path = request.uri().path().to_owned();
    let role = match request.extensions().get::<Session>() {
        Some(session) => session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .map(|user| user.role),
        None => None,
    };

    match guard_redirect(&path, role) {
        Some(target) => {
            tracing::debug!(path, target, "Role guard redirect");
            Redirect::to(target).into_response()
        }
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unguarded_paths_pass() {
        assert_eq!(guard_redirect("/", None), None);
        assert_eq!(guard_redirect("/checkout", None), None);
        assert_eq!(guard_redirect("/restaurant/1", None), None);
        assert_eq!(guard_redirect("/api/chat", Some(Role::Admin)), None);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(guard_redirect("/recipes", None), Some(LOGIN_PATH));
        assert_eq!(guard_redirect("/admin/dashboard", None), Some(LOGIN_PATH));
    }

    #[test]
    fn test_roles_stay_in_their_area() {
        assert_eq!(guard_redirect("/recipes", Some(Role::User)), None);
        assert_eq!(guard_redirect("/admin/profile", Some(Role::Admin)), None);
        assert_eq!(
            guard_redirect("/superadmin/dashboard", Some(Role::Admin)),
            Some("/admin/dashboard")
        );
        assert_eq!(
            guard_redirect("/admin/dashboard", Some(Role::SuperAdmin)),
            Some("/superadmin/dashboard")
        );
        assert_eq!(guard_redirect("/admin/dashboard", Some(Role::User)), Some("/recipes"));
    }
}
