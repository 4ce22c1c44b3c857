//! Application state shared across handlers

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::repositories::{ProductRepository, SessionRepository, UserRepository};
use crate::storage::LocalImageStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: ServerConfig,
    pub user_repository: UserRepository,
    pub session_repository: SessionRepository,
    pub product_repository: ProductRepository,
    pub image_store: LocalImageStore,
}
