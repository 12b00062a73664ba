//! Promotions tab: promo codes and the creation form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wakalni_core::PromotionId;
use wakalni_core::promo::{Promotion, PromotionDraft, PromotionKind, TargetAudience};

use super::{SuperFrame, SuperTab};
use crate::db::PromotionRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Flash;
use crate::routes::{outcome, parse_decimal, parse_price, redirect_with};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "superadmin/promotions.html")]
pub struct PromotionsTemplate {
    pub ctx: PageContext,
    pub frame: SuperFrame,
    pub promotions: Vec<Promotion>,
    pub active: usize,
    pub total_uses: u32,
    pub kinds: &'static [PromotionKind],
    pub audiences: &'static [TargetAudience],
}

/// Promotion creation form; numbers and dates arrive as typed text.
#[derive(Debug, Default, Deserialize)]
pub struct PromotionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: PromotionKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub min_order: String,
    #[serde(default)]
    pub max_discount: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub usage_limit: String,
    /// Checkbox; absent when unticked.
    #[serde(default)]
    pub is_active: Option<String>,
    #[serde(default)]
    pub target_audience: TargetAudience,
}

/// Parse an optional `YYYY-MM-DD` date field; blank means absent.
fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{field} must be a date")))
}

impl PromotionForm {
    /// Parse the typed fields into a draft; validation is left to the draft.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` naming the first malformed number or date.
    pub fn into_draft(self) -> Result<PromotionDraft> {
        let usage_limit = match self.usage_limit.trim() {
            "" => None,
            text => Some(text.parse::<u32>().map_err(|_| {
                AppError::BadRequest("usage_limit must be a whole number".to_string())
            })?),
        };

        Ok(PromotionDraft {
            value: parse_decimal("value", &self.value)?.unwrap_or_default(),
            min_order: parse_price("min_order", &self.min_order)?,
            max_discount: parse_price("max_discount", &self.max_discount)?,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: parse_date("end_date", &self.end_date)?,
            usage_limit,
            is_active: Some(self.is_active.is_some()),
            title: self.title,
            description: self.description,
            kind: self.kind,
            code: self.code,
            target_audience: self.target_audience,
        })
    }
}

pub(super) async fn page(state: &AppState, ctx: PageContext, frame: SuperFrame) -> PromotionsTemplate {
    let promotions = PromotionRepository::new(state.store()).all().await;
    PromotionsTemplate {
        active: promotions.iter().filter(|p| p.is_active).count(),
        total_uses: promotions.iter().map(|p| p.used_count).sum(),
        promotions,
        kinds: &PromotionKind::ALL,
        audiences: &TargetAudience::ALL,
        ctx,
        frame,
    }
}

/// Create a promotion.
///
/// # Errors
///
/// Returns `BadRequest` for malformed numbers or dates, or an error if the
/// session store fails.
#[instrument(skip(state, session, form), fields(code = %form.code))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PromotionForm>,
) -> Result<Redirect> {
    let draft = form.into_draft()?;
    let result = PromotionRepository::new(state.store()).create(draft).await;
    let flash = outcome(result, |promotion| format!("Promotion {} created", promotion.code))?;
    redirect_with(&session, SuperTab::Promotions.path(), flash).await
}

/// Enable or disable a promotion.
///
/// # Errors
///
/// Returns `NotFound` for an unknown promotion.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PromotionId>,
) -> Result<Redirect> {
    let promotion = PromotionRepository::new(state.store()).toggle(&id).await?;
    let state_label = if promotion.is_active { "enabled" } else { "disabled" };
    let flash = Flash::success(format!("Promotion {} {state_label}", promotion.code));
    redirect_with(&session, SuperTab::Promotions.path(), flash).await
}
