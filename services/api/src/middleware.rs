//! Authentication middleware for bearer token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, models::User, state::AppState, token};
use uuid::Uuid;

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`] and read by handlers. Carries the session id so
/// logout can revoke exactly the token used for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session_id: Uuid,
}

/// Validate the bearer token on the request and attach the current user.
/// Missing, malformed, unknown, and expired tokens all yield the same 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let session = state
        .session_repository
        .find_valid_by_token_hash(&token::hash_token(token))
        .await
        .map_err(|e| {
            error!("Failed to look up session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthenticated)?;

    let user = state
        .user_repository
        .find_by_id(session.user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user for session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut().insert(CurrentUser {
        user,
        session_id: session.id,
    });

    Ok(next.run(req).await)
}
