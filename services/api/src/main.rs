use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod storage;
mod token;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool};
use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    repositories::{ProductRepository, SessionRepository, UserRepository},
    state::AppState,
    storage::LocalImageStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting product catalog service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let server_config = ServerConfig::from_env()?;

    // The upload directory must exist before the first file lands and
    // before ServeDir starts answering for it
    tokio::fs::create_dir_all(server_config.upload_dir.join("products")).await?;

    let user_repository = UserRepository::new(pool.clone());
    let session_repository = SessionRepository::new(pool.clone());
    let product_repository = ProductRepository::new(pool.clone());
    let image_store = LocalImageStore::new(server_config.upload_dir.clone());

    let bind_addr = server_config.bind_addr.clone();

    let app_state = AppState {
        db_pool: pool,
        config: server_config,
        user_repository,
        session_repository,
        product_repository,
        image_store,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Product catalog service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
