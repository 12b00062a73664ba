//! Wallet tab: platform commission ledger.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::Price;
use wakalni_core::wallet::{LedgerFilter, Transaction, TransactionKind};

use super::{SuperFrame, SuperTab};
use crate::db::{WalletOwner, WalletRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::routes::{ListQuery, WITHDRAWAL_METHODS, WithdrawForm, redirect_with, request_withdrawal};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/wallet.html")]
pub struct WalletTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub balance: Price,
    pub pending: Price,
    pub total_commission: Price,
    pub total_withdrawn: Price,
    pub transactions: Vec<Transaction>,
    pub methods: &'static [&'static str],
    pub query: ListQuery,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: SuperFrame,
    query: ListQuery,
) -> WalletTemplate {
    let ledger = WalletRepository::new(state.store())
        .ledger(&WalletOwner::Platform)
        .await;
    let filter = LedgerFilter {
        kind: query.kind.clone(),
        status: query.status.clone(),
    };

    WalletTemplate {
        balance: ledger.balance(),
        pending: ledger.pending_amount(),
        total_commission: ledger.completed_total(TransactionKind::Income),
        total_withdrawn: ledger.completed_total(TransactionKind::Withdrawal),
        transactions: ledger.filtered(&filter).into_iter().cloned().collect(),
        methods: &WITHDRAWAL_METHODS,
        ctx,
        frame,
        query,
    }
}

/// Request a withdrawal of platform commission.
///
/// # Errors
///
/// Returns `BadRequest` when the amount is not a number.
#[instrument(skip(state, session, form))]
pub async fn withdraw(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WithdrawForm>,
) -> Result<Redirect> {
    let flash = request_withdrawal(&state, &WalletOwner::Platform, form).await?;
    redirect_with(&session, SuperTab::Wallet.path(), flash).await
}
