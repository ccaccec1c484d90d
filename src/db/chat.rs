// SPDX-License-Identifier: MIT

//! Chat history persistence. Append-only; rows are never updated.

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use super::Database;
use crate::error::AppError;
use crate::models::{ChatContext, ChatHistory};

impl Database {
    pub async fn insert_chat(
        &self,
        user_id: &str,
        trip_id: Option<&str>,
        message: &str,
        response: &str,
        context: &ChatContext,
    ) -> Result<ChatHistory, AppError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, ChatHistory>(
            "INSERT INTO chat_history \
             (id, user_id, trip_id, message, response, context, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING *",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(trip_id)
        .bind(message)
        .bind(response)
        .bind(Json(context))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(row)
    }

    /// Page of a trip's chat history for one user, oldest first, with
    /// the total row count.
    pub async fn chat_history(
        &self,
        user_id: &str,
        trip_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ChatHistory>, i64), AppError> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        let messages = sqlx::query_as::<_, ChatHistory>(
            "SELECT * FROM chat_history WHERE user_id = ? AND trip_id = ? \
             ORDER BY created_at ASC, rowid ASC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(trip_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_history WHERE user_id = ? AND trip_id = ?",
        )
        .bind(user_id)
        .bind(trip_id)
        .fetch_one(self.pool())
        .await?;

        Ok((messages, total))
    }
}
