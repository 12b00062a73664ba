//! Promo code validation endpoint.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use wakalni_core::Price;

use crate::db::PromotionRepository;
use crate::state::AppState;

/// Request body: the typed code and the current order amount.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub code: String,
    pub order_amount: Price,
}

/// Response body; validity is reported in the body, never in the status.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate a promo code for an order amount.
///
/// POST /api/promotions/validate
#[instrument(skip(state, request), fields(code = %request.code))]
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidateResponse> {
    let today = chrono::Utc::now().date_naive();
    let response = match PromotionRepository::new(state.store())
        .validate(&request.code, request.order_amount, today)
        .await
    {
        Ok(applied) => ValidateResponse {
            valid: true,
            discount: Some(applied.discount.amount()),
            error: None,
        },
        Err(rejection) => {
            tracing::debug!(%rejection, "Promo code rejected");
            ValidateResponse {
                valid: false,
                discount: None,
                error: Some(rejection.to_string()),
            }
        }
    };
    Json(response)
}
