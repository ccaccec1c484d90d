// SPDX-License-Identifier: MIT

//! Registration, login, and credential management.

use crate::db::NewUser;
use crate::error::{AppError, FieldError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{UserPreferences, UserProfile};
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::ValidateEmail;

const MIN_PASSWORD_LENGTH: usize = 6;
const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 50;

/// Routes reachable without a token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Auth routes that require a valid token.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/auth/profile",
            axum::routing::get(super::users::get_profile).put(super::users::update_profile),
        )
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/logout", post(logout))
}

// ─── Register / Login ────────────────────────────────────────

/// All fields optional so malformed bodies produce a 400 field list
/// instead of a bare deserialization failure.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferences: Option<UserPreferences>,
}

#[derive(Serialize)]
pub struct AuthPayload {
    pub user: UserProfile,
    pub token: String,
}

/// Register a new account and hand back a session token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let mut errors = Vec::new();

    let email = body.email.unwrap_or_default().trim().to_lowercase();
    if !email.validate_email() {
        errors.push(FieldError::new("email", "A valid email is required"));
    }

    let password = body.password.unwrap_or_default();
    if password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    let first_name = body.first_name.unwrap_or_default().trim().to_string();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&first_name.chars().count()) {
        errors.push(FieldError::new(
            "firstName",
            "First name must be 2 to 50 characters",
        ));
    }

    let last_name = body.last_name.unwrap_or_default().trim().to_string();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&last_name.chars().count()) {
        errors.push(FieldError::new(
            "lastName",
            "Last name must be 2 to 50 characters",
        ));
    }

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user = state
        .db
        .create_user(NewUser {
            email,
            password,
            first_name,
            last_name,
            preferences: body.preferences.unwrap_or_default(),
        })
        .await?;

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            AuthPayload {
                user: user.profile(),
                token,
            },
            "User registered successfully",
        )),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Verify credentials and issue a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>> {
    let email = body.email.unwrap_or_default().trim().to_lowercase();
    let password = body.password.unwrap_or_default();

    // Same error for unknown email and wrong password.
    let user = state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.verify_password(&password)? {
        return Err(AppError::Unauthorized);
    }

    if !user.is_active {
        return Err(AppError::Unauthorized);
    }

    state.db.touch_last_login(&user.id).await?;
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(ApiResponse::data_with_message(
        AuthPayload {
            user: user.profile(),
            token,
        },
        "Login successful",
    )))
}

// ─── Credential Management ───────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Change the password for the authenticated user.
async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    let new_password = body.new_password.unwrap_or_default();
    if new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(vec![FieldError::new(
            "newPassword",
            "Password must be at least 6 characters",
        )]));
    }

    let user = state
        .db
        .find_user_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !user.verify_password(&body.current_password.unwrap_or_default())? {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }

    state.db.update_password(&user.id, &new_password).await?;
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// Sessions are stateless JWTs; logout exists so clients have a
/// definite endpoint to call when discarding the token.
async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logged out successfully"))
}
