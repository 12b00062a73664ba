//! Users tab: customers and restaurant staff.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::accounts::{AccountQuery, Customer, RestaurantAdmin};
use wakalni_core::{AdminAction, AdminId, CustomerAction, CustomerId};

use super::{ActionForm, SuperFrame, SuperTab};
use crate::db::AccountRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{ListQuery, redirect_with};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/users.html")]
pub struct UsersTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub customers: Vec<Customer>,
    pub admins: Vec<RestaurantAdmin>,
    pub query: ListQuery,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: SuperFrame,
    query: ListQuery,
) -> UsersTemplate {
    let accounts = AccountRepository::new(state.store());
    let filter = AccountQuery {
        q: query.q.clone(),
        status: query.status.clone(),
    };

    UsersTemplate {
        customers: accounts.customers(&filter).await,
        admins: accounts.admins(&filter).await,
        ctx,
        frame,
        query,
    }
}

/// Ban or unban a customer.
///
/// # Errors
///
/// Returns `NotFound` for an unknown customer and a conflict when the
/// action does not apply to its status.
#[instrument(skip(state, session))]
pub async fn set_customer_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CustomerId>,
    Form(form): Form<ActionForm<CustomerAction>>,
) -> Result<Redirect> {
    let customer = AccountRepository::new(state.store())
        .apply_customer_action(&id, form.action)
        .await?;
    let flash = Flash::success(format!("{} is now {}", customer.name, customer.status.as_str()));
    redirect_with(&session, SuperTab::Users.path(), flash).await
}

/// Suspend or reactivate a restaurant staff account.
///
/// # Errors
///
/// Returns `NotFound` for an unknown account and a conflict when the action
/// does not apply to its status.
#[instrument(skip(state, session))]
pub async fn set_admin_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AdminId>,
    Form(form): Form<ActionForm<AdminAction>>,
) -> Result<Redirect> {
    let admin = AccountRepository::new(state.store())
        .apply_admin_action(&id, form.action)
        .await?;
    let flash = Flash::success(format!("{} is now {}", admin.name, admin.status.as_str()));
    redirect_with(&session, SuperTab::Users.path(), flash).await
}
