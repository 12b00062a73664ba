//! Chat assistant widget endpoint.
//!
//! The assistant is canned: after the simulated network delay it answers
//! with one of a few fixed French replies.

use axum::{Json, extract::State};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiError;
use crate::state::AppState;

/// Replies the assistant picks from.
pub const CANNED_REPLIES: [&str; 5] = [
    "Je comprends, pouvez-vous préciser ?",
    "Intéressant !",
    "Je vais réfléchir à ça...",
    "Bonne question !",
    "Je ne suis pas sûr, mais je crois que oui.",
];

/// Longest message accepted, in characters.
const MAX_MESSAGE_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: &'static str,
}

/// Answer a chat message.
///
/// POST /api/chat
///
/// # Errors
///
/// Returns `ApiError` (400) for a blank or oversized message.
#[instrument(skip(state, request))]
pub async fn reply(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::new("message cannot be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::new(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    state.simulate_latency().await;
    let reply = CANNED_REPLIES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("Bonne question !");
    Ok(Json(ChatResponse { reply }))
}
