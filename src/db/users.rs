// SPDX-License-Identifier: MIT

//! User persistence. Passwords are bcrypt-hashed before any row is
//! written; plaintext never reaches the database.

use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use super::Database;
use crate::error::AppError;
use crate::models::{User, UserPreferences};

/// Attributes for registering a user. `password` is plaintext here and
/// hashed on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub preferences: UserPreferences,
}

impl Database {
    pub async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let password_hash = hash_password(&new.password)?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users \
             (id, email, password_hash, first_name, last_name, preferences, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?) \
             RETURNING *",
        )
        .bind(&id)
        .bind(&new.email)
        .bind(&password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(Json(&new.preferences))
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await;

        result.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
            other => other,
        })
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Update profile fields; absent fields keep their current value.
    pub async fn update_user_profile(
        &self,
        id: &str,
        first_name: Option<String>,
        last_name: Option<String>,
        preferences: Option<UserPreferences>,
    ) -> Result<User, AppError> {
        let user = self
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let first_name = first_name.unwrap_or(user.first_name);
        let last_name = last_name.unwrap_or(user.last_name);
        let preferences = preferences.unwrap_or(user.preferences.0);

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = ?, last_name = ?, preferences = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(Json(&preferences))
        .bind(Utc::now())
        .bind(id)
        .fetch_one(self.pool())
        .await?;

        Ok(updated)
    }

    /// Replace the stored password hash with a hash of `new_password`.
    pub async fn update_password(&self, id: &str, new_password: &str) -> Result<(), AppError> {
        let password_hash = hash_password(new_password)?;

        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<(), AppError> {
        let now = Utc::now();
        sqlx::query("UPDATE users SET last_login = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}
