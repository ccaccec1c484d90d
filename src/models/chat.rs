// SPDX-License-Identifier: MIT

//! Chat history model. Rows are append-only, one per exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub id: String,
    pub user_id: String,
    pub trip_id: Option<String>,
    pub message: String,
    pub response: String,
    pub context: Json<ChatContext>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Context the client attaches to a chat message. Trip-scoped chat
/// references the trip by id; general chat carries none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatContext {
    pub current_trip_id: Option<String>,
    pub topic: Option<String>,
}
