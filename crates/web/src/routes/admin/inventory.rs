//! Inventory tab: the stock room.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::inventory::{
    InventoryDraft, InventoryFilter, InventoryItem, StockChange, StockChangeKind, low_stock_count,
    total_value,
};
use wakalni_core::{InventoryItemId, Price};

use super::{AdminFrame, AdminTab};
use crate::db::InventoryRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{ListQuery, outcome, parse_decimal, parse_price, redirect_with};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "admin/inventory.html")]
pub struct InventoryTemplate {
    pub ctx: PageContext,
    pub frame: AdminFrame,
    pub items: Vec<InventoryItem>,
    pub categories: Vec<String>,
    pub total_value: Price,
    pub low_stock: usize,
    pub item_count: usize,
    pub query: ListQuery,
}

/// New stock item form; numbers arrive as typed text.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub current_stock: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub min_stock: String,
    #[serde(default)]
    pub max_stock: String,
    #[serde(default)]
    pub cost_per_unit: String,
    #[serde(default)]
    pub supplier: String,
}

impl InventoryForm {
    /// Parse the numeric fields; blanks are left to the draft defaults.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` naming the first field that is not a number.
    pub fn into_draft(self) -> Result<InventoryDraft> {
        Ok(InventoryDraft {
            current_stock: parse_decimal("current_stock", &self.current_stock)?,
            min_stock: parse_decimal("min_stock", &self.min_stock)?,
            max_stock: parse_decimal("max_stock", &self.max_stock)?,
            cost_per_unit: parse_price("cost_per_unit", &self.cost_per_unit)?,
            unit: Some(self.unit),
            name: self.name,
            category: self.category,
            supplier: self.supplier,
        })
    }
}

/// Manual stock adjustment form.
#[derive(Debug, Deserialize)]
pub struct StockForm {
    #[serde(rename = "type")]
    pub kind: StockChangeKind,
    #[serde(default)]
    pub quantity: String,
}

pub(super) async fn page(
    state: &AppState,
    ctx: PageContext,
    frame: AdminFrame,
    query: ListQuery,
) -> InventoryTemplate {
    let repo = InventoryRepository::new(state.store());
    let all = repo.all().await;
    let mut categories: Vec<String> = all.iter().map(|item| item.category.clone()).collect();
    categories.sort();
    categories.dedup();

    let filter = InventoryFilter {
        q: query.q.clone(),
        category: query.category.clone(),
    };

    InventoryTemplate {
        items: all.iter().filter(|item| filter.matches(item)).cloned().collect(),
        total_value: total_value(&all),
        low_stock: low_stock_count(&all),
        item_count: all.len(),
        categories,
        ctx,
        frame,
        query,
    }
}

/// Add a stock item.
///
/// # Errors
///
/// Returns `BadRequest` for malformed numbers, or an error if the session
/// store fails.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<InventoryForm>,
) -> Result<Redirect> {
    let draft = form.into_draft()?;
    let today = chrono::Utc::now().date_naive();
    let result = InventoryRepository::new(state.store()).create(draft, today).await;
    let flash = outcome(result, |item| format!("{} added to inventory", item.name))?;
    redirect_with(&session, AdminTab::Inventory.path(), flash).await
}

/// Add or remove stock.
///
/// # Errors
///
/// Returns `NotFound` for an unknown item and `BadRequest` for a malformed
/// quantity.
#[instrument(skip(state, session))]
pub async fn adjust(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<InventoryItemId>,
    Form(form): Form<StockForm>,
) -> Result<Redirect> {
    let change = StockChange {
        kind: form.kind,
        quantity: parse_decimal("quantity", &form.quantity)?.unwrap_or_default(),
    };
    let today = chrono::Utc::now().date_naive();
    let result = InventoryRepository::new(state.store())
        .adjust(&id, change, today)
        .await;
    let flash = outcome(result, |item| {
        format!("{} now at {} {}", item.name, item.current_stock, item.unit)
    })?;
    redirect_with(&session, AdminTab::Inventory.path(), flash).await
}

/// Remove a stock item.
///
/// # Errors
///
/// Returns `NotFound` for an unknown item.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<InventoryItemId>,
) -> Result<Redirect> {
    InventoryRepository::new(state.store()).delete(&id).await?;
    redirect_with(&session, AdminTab::Inventory.path(), Flash::success("Item deleted")).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_into_draft_keeps_blanks_absent() {
        let draft = InventoryForm {
            name: "Semolina".to_owned(),
            category: "Grains".to_owned(),
            current_stock: "12.5".to_owned(),
            ..InventoryForm::default()
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.current_stock, Some(Decimal::new(125, 1)));
        assert_eq!(draft.min_stock, None);
        assert_eq!(draft.cost_per_unit, None);
    }

    #[test]
    fn test_into_draft_rejects_text_numbers() {
        let result = InventoryForm {
            max_stock: "plenty".to_owned(),
            ..InventoryForm::default()
        }
        .into_draft();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
