// SPDX-License-Identifier: MIT

//! Travel chat routes.

use crate::error::{AppError, FieldError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ChatContext, ChatHistory};
use crate::response::ApiResponse;
use crate::services::generation::{ChatReply, PromptContext};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_HISTORY_PAGE_SIZE: u32 = 50;
const MAX_HISTORY_PAGE_SIZE: u32 = 100;

/// Chat routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chat/message", post(send_message))
        .route("/api/chat/history/{trip_id}", get(history))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub context: Option<ChatContext>,
}

/// Answer a travel question, grounding the reply in the referenced trip
/// and the user's saved preferences when available. The exchange is
/// recorded in the chat history.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>> {
    let message = body.message.unwrap_or_default().trim().to_string();
    if message.is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "message",
            "Message is required",
        )]));
    }

    let context = body.context.unwrap_or_default();

    // A referenced trip must exist and belong to the caller.
    let trip = match &context.current_trip_id {
        Some(trip_id) => Some(
            state
                .db
                .find_trip(&auth.user_id, trip_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?,
        ),
        None => None,
    };

    let user = state.db.find_user_by_id(&auth.user_id).await?;
    let preferences = user.as_ref().map(|u| &u.preferences.0);

    let reply = state
        .generation
        .chat(
            &message,
            &PromptContext {
                trip: trip.as_ref(),
                preferences,
            },
        )
        .await?;

    state
        .db
        .insert_chat(
            &auth.user_id,
            trip.as_ref().map(|t| t.id.as_str()),
            &message,
            &reply.message,
            &context,
        )
        .await?;

    Ok(Json(ApiResponse::data(reply)))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    pub messages: Vec<ChatHistory>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: u32,
}

/// Chat history for one trip, oldest first.
async fn history(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(trip_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryPayload>>> {
    // History is scoped to a trip the caller owns.
    state
        .db
        .find_trip(&auth.user_id, &trip_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_PAGE_SIZE)
        .clamp(1, MAX_HISTORY_PAGE_SIZE);

    let (messages, total_count) = state
        .db
        .chat_history(&auth.user_id, &trip_id, page, limit)
        .await?;

    Ok(Json(ApiResponse::data(HistoryPayload {
        messages,
        total_count,
        total_pages: (total_count + limit as i64 - 1) / limit as i64,
        current_page: page,
    })))
}
