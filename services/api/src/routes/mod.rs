//! HTTP routes for the product catalog service

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod products;

/// Body cap sized for multipart requests carrying several 2MB images
const MAX_REQUEST_BYTES: usize = 24 * 1024 * 1024;

/// Create the router for the product catalog service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/profile", get(auth::profile))
        .route("/logout", post(auth::logout))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::show)
                .put(products::update)
                .patch(products::update)
                .delete(products::destroy),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(protected_routes)
        .nest_service("/storage", ServeDir::new(state.config.upload_dir.clone()))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "catalog-api"
    }))
}
