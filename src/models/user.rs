// SPDX-License-Identifier: MIT

//! User model and profile serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::AppError;

/// User row. Never serialized outward directly; use [`User::profile`]
/// so the password hash cannot leak into a response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub preferences: Json<UserPreferences>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Compare a plaintext password against the stored hash.
    pub fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, &self.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {e}")))
    }

    /// Outward-facing view of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            preferences: self.preferences.0.clone(),
            profile_picture: self.profile_picture.clone(),
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// API view of a user, without credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferences: UserPreferences,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account-level travel preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub currency: String,
    pub language: String,
    pub budget: BudgetTier,
    pub interests: Vec<String>,
    pub travel_style: super::trip::TravelStyle,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            language: "en".to_string(),
            budget: BudgetTier::Medium,
            interests: Vec::new(),
            travel_style: super::trip::TravelStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_omits_password_hash() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            preferences: Json(UserPreferences::default()),
            profile_picture: None,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["preferences"]["budget"], "medium");
    }
}
