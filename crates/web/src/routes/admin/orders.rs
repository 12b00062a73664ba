//! Orders tab: the kitchen board.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::orders::{Order, OrderFilter, StatusCounts, time_ago};
use wakalni_core::{OrderId, OrderStatus, OrderType};

use super::{AdminFrame, AdminTab};
use crate::db::OrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{ListQuery, redirect_with};
use crate::state::AppState;

/// An order card with its age already rendered.
#[derive(Debug, Clone)]
pub struct OrderCard {
    pub order: Order,
    pub age: String,
}

impl OrderCard {
    #[must_use]
    pub fn new(order: Order, now: DateTime<Utc>) -> Self {
        let age = time_ago(order.created_at, now);
        Self { order, age }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub orders: Vec<OrderCard>,
    pub counts: StatusCounts,
    pub query: ListQuery,
    pub statuses: &'static [OrderStatus],
    pub types: &'static [OrderType],
}

/// Requested status of an order.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: AdminFrame,
    query: ListQuery,
) -> OrdersTemplate {
    let repo = OrderRepository::new(state.store());
    let filter = OrderFilter {
        q: query.q.clone(),
        status: query.status.clone(),
        order_type: query.kind.clone(),
    };
    let counts = StatusCounts::of(&repo.all().await);
    let now = Utc::now();

    OrdersTemplate {
        ctx,
        frame,
        orders: repo
            .list(&filter)
            .await
            .into_iter()
            .map(|order| OrderCard::new(order, now))
            .collect(),
        counts,
        query,
        statuses: &OrderStatus::ALL,
        types: &OrderType::ALL,
    }
}

/// Move an order to the requested status.
///
/// # Errors
///
/// Returns `NotFound` for an unknown order and a conflict when the workflow
/// does not allow the move.
#[instrument(skip(state, session))]
pub async fn set_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let order = OrderRepository::new(state.store())
        .set_status(&id, form.status)
        .await?;
    tracing::info!(order_id = %order.id, status = order.status.as_str(), "Order status changed");

    let flash = Flash::success(format!("Order {} is now {}", order.id, order.status.label()));
    redirect_with(&session, AdminTab::Orders.path(), flash).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[tokio::test]
    async fn test_cards_render_age() {
        let store = crate::db::tests::store();
        let orders = OrderRepository::new(&store).all().await;
        let now = orders[0].created_at + Duration::minutes(5);
        let card = OrderCard::new(orders[0].clone(), now);
        assert_eq!(card.age, "5 minutes ago");
    }
}
