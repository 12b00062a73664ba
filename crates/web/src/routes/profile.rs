//! Consumer profile and client wallet.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::Price;
use wakalni_core::wallet::{Ledger, Transaction, TransferRequest};

use super::{outcome, parse_price, redirect_with};
use crate::db::{WalletOwner, WalletRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::{LOGIN_PATH, PageContext, clear_current_user};
use crate::models::{CurrentUser, Flash};
use crate::state::AppState;

const PROFILE_PATH: &str = "/profile";

/// Transactions listed under the balance.
const RECENT_TRANSACTIONS: usize = 10;

/// Wallet key of anonymous visitors, shared by all of them.
pub const GUEST_WALLET: &str = "guest";

/// Wallet of the signed-in user, or the shared guest wallet.
#[must_use]
pub fn client_wallet(user: Option<&CurrentUser>) -> WalletOwner {
    WalletOwner::Client(user.map_or_else(|| GUEST_WALLET.to_owned(), CurrentUser::wallet_key))
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub balance: Price,
    pub transactions: Vec<Transaction>,
    pub quick_amounts: Vec<Price>,
    pub payment_methods: Vec<String>,
}

/// Top-up form data. The amount arrives as typed text.
#[derive(Debug, Deserialize)]
pub struct TopUpForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub method: String,
}

/// Whether the backend still accepts the session token of `user`.
///
/// Without a configured backend or a token there is nothing to check. An
/// unreachable backend keeps the local session.
async fn token_still_valid(state: &AppState, user: &CurrentUser) -> bool {
    let (Some(api), Some(token)) = (state.user_api(), user.token.as_deref()) else {
        return true;
    };
    match api.verify(token).await {
        Ok(verified) => {
            tracing::debug!(user_id = %verified.id, "Session token verified");
            true
        }
        Err(err) if err.is_rejection() => false,
        Err(err) => {
            tracing::warn!(error = %err, "User API verify failed");
            true
        }
    }
}

/// Display the profile and wallet.
///
/// A signed-in user whose token the backend refuses is signed out and sent
/// to the login page.
///
/// # Errors
///
/// Returns an error if the session store fails.
#[instrument(skip(state, session, ctx))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<Response> {
    if let Some(user) = &ctx.user {
        if !token_still_valid(&state, user).await {
            clear_current_user(&session).await?;
            tracing::info!(user_id = %user.id, "Session token expired");
            let flash = Flash::error("Your session has expired, please sign in again");
            return Ok(redirect_with(&session, LOGIN_PATH, flash)
                .await?
                .into_response());
        }
    }

    let ledger: Ledger = WalletRepository::new(state.store())
        .ledger(&client_wallet(ctx.user.as_ref()))
        .await;
    let options = state.store().wallet_options();

    Ok(ProfileTemplate {
        balance: ledger.balance(),
        transactions: ledger
            .transactions
            .into_iter()
            .take(RECENT_TRANSACTIONS)
            .collect(),
        quick_amounts: options.quick_amounts.clone(),
        payment_methods: options.payment_methods.clone(),
        ctx,
    }
    .into_response())
}

/// Credit the client wallet.
///
/// # Errors
///
/// Returns `BadRequest` when the amount is not a number, or an error if the
/// session store fails.
#[instrument(skip(state, session, ctx))]
pub async fn top_up(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
    Form(form): Form<TopUpForm>,
) -> Result<Redirect> {
    let request = TransferRequest {
        amount: parse_price("amount", &form.amount)?.unwrap_or(Price::ZERO),
        method: form.method,
    };

    state.simulate_latency().await;
    let result = WalletRepository::new(state.store())
        .top_up(&client_wallet(ctx.user.as_ref()), &request, chrono::Utc::now())
        .await;
    let flash = outcome(result, |transaction| {
        format!("{} added to your wallet", transaction.amount)
    })?;
    redirect_with(&session, PROFILE_PATH, flash).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wakalni_core::{Role, UserId};

    use super::*;

    #[test]
    fn test_client_wallet_keys() {
        assert_eq!(client_wallet(None), WalletOwner::Client("guest".to_owned()));

        let user = CurrentUser {
            id: UserId::new("u7"),
            name: "Amine".to_owned(),
            email: "amine@example.com".to_owned(),
            role: Role::User,
            token: None,
        };
        assert_eq!(client_wallet(Some(&user)), WalletOwner::Client("u7".to_owned()));
    }

    #[tokio::test]
    async fn test_token_check_without_backend() {
        let state = AppState::new(crate::config::WakalniConfig::default()).unwrap();
        let user = CurrentUser {
            id: UserId::new("u7"),
            name: "Amine".to_owned(),
            email: "amine@example.com".to_owned(),
            role: Role::User,
            token: Some("expired".to_owned()),
        };
        assert!(token_still_valid(&state, &user).await);
    }
}
