use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use campusconnect::config::Config;
use campusconnect::database;
use campusconnect::error::AppError;
use campusconnect::web;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("CampusConnect failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::load()?;
    info!(
        "Starting CampusConnect build {} with database {}",
        env!("CAMPUSCONNECT_BUILD_ID"),
        config.database_url
    );

    let pool = database::connect(&config.database_url).await?;
    database::migrate(&pool).await?;

    let app = web::router(pool);

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .map_err(|e| AppError::Config(format!("cannot parse {}: {}", config.bind_addr(), e)))?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = config.fallback_bind_addr();
            warn!("Could not bind {}: {}. Trying fallback {}", addr, e, fallback);
            tokio::net::TcpListener::bind(&fallback)
                .await
                .map_err(|e| AppError::Config(format!("cannot bind {}: {}", fallback, e)))?
        }
    };

    let bound_addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("listener has no local address: {}", e)))?;
    info!("Server running on http://{}", bound_addr);
    info!("Sign up at http://{}/signup/", bound_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("server error: {}", e)))
}
