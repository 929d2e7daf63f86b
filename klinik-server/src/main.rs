//! klinik-server — clinic front-desk administration service
//!
//! Long-running JSON API over PostgreSQL that:
//! - Maintains the service catalog (layanan)
//! - Records patient visit transactions and their service lines
//! - Aggregates daily / weekly / monthly revenue reports (laporan)
//! - Manages staff accounts and admin profiles (pengguna)

mod api;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "klinik_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting klinik-server (env: {})", config.environment);

    // Initialize application state (pool + migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("klinik-server HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
