// SPDX-License-Identifier: MIT

//! Profile routes for authenticated users.

use crate::error::{AppError, FieldError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{UserPreferences, UserProfile};
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// User routes (require authentication via JWT).
/// The same profile handlers are also mounted under /api/auth.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/users/profile",
            get(get_profile).put(update_profile),
        )
        .route(
            "/api/users/upload-profile-picture",
            post(upload_profile_picture),
        )
}

/// Get the authenticated user's profile.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let user = state
        .db
        .find_user_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::data(user.profile())))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferences: Option<UserPreferences>,
}

/// Update name and preferences. Email and password have their own
/// flows; fields absent from the body keep their current value.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let mut errors = Vec::new();
    if matches!(&body.first_name, Some(name) if name.trim().is_empty()) {
        errors.push(FieldError::new("firstName", "First name cannot be empty"));
    }
    if matches!(&body.last_name, Some(name) if name.trim().is_empty()) {
        errors.push(FieldError::new("lastName", "Last name cannot be empty"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = state
        .db
        .update_user_profile(
            &auth.user_id,
            body.first_name.map(|n| n.trim().to_string()),
            body.last_name.map(|n| n.trim().to_string()),
            body.preferences,
        )
        .await?;

    Ok(Json(ApiResponse::data_with_message(
        user.profile(),
        "Profile updated successfully",
    )))
}

/// Placeholder until object storage is wired up.
async fn upload_profile_picture() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(
        "Profile picture upload feature coming soon",
    ))
}
