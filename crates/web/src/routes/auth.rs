//! Authentication route handlers.
//!
//! Login and signup share one page. Valid submissions go to the external
//! user backend when one is configured; otherwise the visitor is signed in
//! with a mock identity after the simulated delay.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::accounts::{Credentials, CredentialsInput, FieldErrors};
use wakalni_core::{Email, Role, UserId};

use super::redirect_with;
use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, PageContext, set_current_user};
use crate::models::{CurrentUser, Flash};
use crate::services::{AuthResponse, RegisterRequest, UserApiError};
use crate::state::AppState;

/// Account types offered by the radio group, in display order.
pub const ROLES: [Role; 3] = [Role::User, Role::Admin, Role::SuperAdmin];

/// Which half of the auth page is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    #[must_use]
    pub const fn is_signup(self) -> bool {
        matches!(self, Self::Signup)
    }

    const fn page(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Signup => "/auth/login?mode=signup",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    #[serde(default)]
    pub mode: AuthMode,
}

/// OTP request form data.
#[derive(Debug, Deserialize)]
pub struct OtpForm {
    #[serde(default)]
    pub email: String,
}

/// Login / signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub mode: AuthMode,
    pub errors: FieldErrors,
    /// Submitted values, echoed back without the password.
    pub input: CredentialsInput,
    pub roles: &'static [Role],
}

/// Display the login page.
pub async fn login_page(ctx: PageContext, Query(query): Query<AuthQuery>) -> LoginTemplate {
    LoginTemplate {
        ctx,
        mode: query.mode,
        errors: FieldErrors::default(),
        input: CredentialsInput::default(),
        roles: &ROLES,
    }
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, ctx, input), fields(email = %input.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(input): Form<CredentialsInput>,
) -> Result<Response> {
    match input.validate_login() {
        Ok(credentials) => sign_in(&state, &session, credentials, AuthMode::Login).await,
        Err(errors) => Ok(invalid(ctx, AuthMode::Login, errors, input)),
    }
}

/// Handle signup form submission.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, ctx, input), fields(email = %input.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(input): Form<CredentialsInput>,
) -> Result<Response> {
    match input.validate_signup() {
        Ok(credentials) => sign_in(&state, &session, credentials, AuthMode::Signup).await,
        Err(errors) => Ok(invalid(ctx, AuthMode::Signup, errors, input)),
    }
}

/// Re-render the form with inline errors (422).
fn invalid(
    ctx: PageContext,
    mode: AuthMode,
    errors: FieldErrors,
    input: CredentialsInput,
) -> Response {
    let template = LoginTemplate {
        ctx,
        mode,
        errors,
        input: CredentialsInput {
            password: String::new(),
            ..input
        },
        roles: &ROLES,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
}

/// Identity for validated credentials, from the backend or a mock.
async fn authenticate(
    state: &AppState,
    credentials: &Credentials,
    mode: AuthMode,
) -> std::result::Result<CurrentUser, UserApiError> {
    let email = &credentials.email;
    let fallback_name = || {
        credentials
            .name
            .clone()
            .unwrap_or_else(|| email.local_part().to_owned())
    };

    let Some(api) = state.user_api() else {
        state.simulate_latency().await;
        return Ok(CurrentUser {
            id: UserId::new(uuid::Uuid::new_v4().to_string()),
            name: fallback_name(),
            email: email.to_string(),
            role: credentials.role,
            token: None,
        });
    };

    let AuthResponse { user, token } = match mode {
        AuthMode::Login => api.login(email.as_str(), &credentials.password).await?,
        AuthMode::Signup => {
            let name = fallback_name();
            api.register(&RegisterRequest {
                name: &name,
                email: email.as_str(),
                password: &credentials.password,
                role: credentials.role,
            })
            .await?
        }
    };

    Ok(CurrentUser {
        id: UserId::new(user.id),
        name: user.name.unwrap_or_else(fallback_name),
        email: user.email,
        role: user.role.unwrap_or(credentials.role),
        token: Some(token),
    })
}

/// Sign the visitor in and send them to their role's home route.
async fn sign_in(
    state: &AppState,
    session: &Session,
    credentials: Credentials,
    mode: AuthMode,
) -> Result<Response> {
    let user = match authenticate(state, &credentials, mode).await {
        Ok(user) => user,
        Err(err) => {
            let message = if err.is_rejection() {
                "Invalid email or password"
            } else {
                tracing::warn!(error = %err, "User API unavailable");
                "Sign-in is unavailable, please try again"
            };
            return Ok(redirect_with(session, mode.page(), Flash::error(message))
                .await?
                .into_response());
        }
    };

    set_current_user(session, &user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    add_breadcrumb("auth", "Signed in", Some(&[("role", user.role.as_str())]));
    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User signed in");

    let flash = Flash::success(format!("Welcome, {}", user.name));
    Ok(redirect_with(session, user.role.home_path(), flash)
        .await?
        .into_response())
}

/// Ask for a one-time password by e-mail.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, form))]
pub async fn send_otp(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OtpForm>,
) -> Result<Redirect> {
    let page = AuthMode::Signup.page();
    let Ok(email) = Email::parse(&form.email) else {
        return redirect_with(&session, page, Flash::error("Enter a valid email")).await;
    };

    let sent = match state.user_api() {
        Some(api) => api.send_otp(email.as_str()).await,
        None => {
            state.simulate_latency().await;
            Ok(())
        }
    };

    let flash = match sent {
        Ok(()) => Flash::success(format!("A code was sent to {email}")),
        Err(err) => {
            tracing::warn!(error = %err, "OTP request failed");
            Flash::error("Could not send the code")
        }
    };
    redirect_with(&session, page, flash).await
}

/// Sign out and clear the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Redirect> {
    if let (Some(api), Some(user)) = (state.user_api(), &user) {
        // The local session ends even when the backend call fails.
        if let Err(err) = api.logout(user.token.as_deref()).await {
            tracing::warn!(error = %err, "User API logout failed");
        }
    }

    clear_sentry_user();
    session.flush().await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::WakalniConfig;

    use super::*;

    fn state() -> AppState {
        AppState::new(WakalniConfig {
            simulated_latency: std::time::Duration::ZERO,
            ..WakalniConfig::default()
        })
        .unwrap()
    }

    fn credentials(name: Option<&str>, role: Role) -> Credentials {
        Credentials {
            email: Email::parse("Yasmine@Example.com").unwrap(),
            password: "secret1".to_owned(),
            role,
            name: name.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_mock_identity_uses_email_local_part() {
        let user = authenticate(&state(), &credentials(None, Role::Admin), AuthMode::Login)
            .await
            .unwrap();
        assert_eq!(user.name, "yasmine");
        assert_eq!(user.email, "yasmine@example.com");
        assert_eq!(user.role, Role::Admin);
        assert!(user.token.is_none());
    }

    #[tokio::test]
    async fn test_mock_identity_keeps_signup_name() {
        let user = authenticate(
            &state(),
            &credentials(Some("Yasmine B."), Role::User),
            AuthMode::Signup,
        )
        .await
        .unwrap();
        assert_eq!(user.name, "Yasmine B.");
    }

    #[test]
    fn test_auth_mode_pages() {
        assert_eq!(AuthMode::default(), AuthMode::Login);
        assert!(AuthMode::Signup.is_signup());
        assert_eq!(AuthMode::Signup.page(), "/auth/login?mode=signup");
    }
}
