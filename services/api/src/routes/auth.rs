//! Authentication endpoints: register, login, profile, logout

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum::Extension;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::ApiError,
    middleware::CurrentUser,
    models::{LoginRequest, NewSession, NewUser, RegisterRequest, UserResponse},
    repositories::user::is_unique_email_violation,
    state::AppState,
    token, validation,
};

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = validation::validate_register(&payload);

    // Uniqueness is only worth checking once the email itself is valid
    if !errors.has("email") {
        let email = payload.email.as_deref().unwrap_or_default().trim();
        let existing = state.user_repository.find_by_email(email).await.map_err(|e| {
            error!("Failed to check email uniqueness: {}", e);
            ApiError::InternalServerError
        })?;
        if existing.is_some() {
            errors.add("email", "Email has already been taken");
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let new_user = NewUser {
        name: payload.name.unwrap_or_default().trim().to_string(),
        email: payload.email.unwrap_or_default().trim().to_string(),
        password: payload.password.unwrap_or_default(),
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        // A concurrent registration can beat the pre-insert check; the
        // unique constraint still reports it as a validation failure
        if is_unique_email_violation(&e) {
            let mut errors = validation::ValidationErrors::new();
            errors.add("email", "Email has already been taken");
            ApiError::Validation(errors)
        } else {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        }
    })?;

    info!("User registered: {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": UserResponse::from(&user),
            "message": "User registered successfully"
        })),
    ))
}

/// User login endpoint. Unknown email and wrong password are reported
/// identically.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let errors = validation::validate_login(&payload);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = payload.email.as_deref().unwrap_or_default().trim();
    let password = payload.password.as_deref().unwrap_or_default();

    let user = state
        .user_repository
        .find_by_email(email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InvalidCredentials)?;

    let verified = state
        .user_repository
        .verify_password(&user, password)
        .await
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::generate_token();
    let expires_at = Utc::now() + chrono::Duration::seconds(state.config.session_ttl_secs as i64);

    state
        .session_repository
        .create(&NewSession {
            user_id: user.id,
            token_hash: token::hash_token(&token),
            expires_at,
        })
        .await
        .map_err(|e| {
            error!("Failed to create session: {}", e);
            ApiError::InternalServerError
        })?;

    info!("User logged in: {}", user.id);

    Ok(Json(json!({
        "user": UserResponse::from(&user),
        "token": token,
        "message": "Logged in successfully"
    })))
}

/// Current user profile endpoint
pub async fn profile(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({
        "user": UserResponse::from(&current.user),
        "message": "Profile retrieved successfully"
    }))
}

/// Logout endpoint; revokes only the token used for this request
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .session_repository
        .delete(current.session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete session: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Logged out successfully"})))
}
