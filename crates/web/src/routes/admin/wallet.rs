//! Wallet tab: restaurant earnings and withdrawals.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::Price;
use wakalni_core::wallet::{LedgerFilter, Transaction, TransactionKind};

use super::{AdminFrame, AdminTab};
use crate::db::{WalletOwner, WalletRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::routes::{ListQuery, WITHDRAWAL_METHODS, WithdrawForm, redirect_with, request_withdrawal};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "admin/wallet.html")]
pub struct WalletTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub balance: Price,
    pub today_income: Price,
    pub pending: Price,
    pub total_income: Price,
    pub total_withdrawn: Price,
    pub transactions: Vec<Transaction>,
    pub methods: &'static [&'static str],
    pub query: ListQuery,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: AdminFrame,
    query: ListQuery,
) -> WalletTemplate {
    let ledger = WalletRepository::new(state.store())
        .ledger(&WalletOwner::Restaurant)
        .await;
    let filter = LedgerFilter {
        kind: query.kind.clone(),
        status: query.status.clone(),
    };

    WalletTemplate {
        balance: ledger.balance(),
        today_income: ledger.income_on(chrono::Utc::now().date_naive()),
        pending: ledger.pending_amount(),
        total_income: ledger.completed_total(TransactionKind::Income),
        total_withdrawn: ledger.completed_total(TransactionKind::Withdrawal),
        transactions: ledger.filtered(&filter).into_iter().cloned().collect(),
        methods: &WITHDRAWAL_METHODS,
        ctx,
        frame,
        query,
    }
}

/// Request a withdrawal of restaurant earnings.
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
    let flash = request_withdrawal(&state, &WalletOwner::Restaurant, form).await?;
    redirect_with(&session, AdminTab::Wallet.path(), flash).await
}
