//! Entry point: load config, wire dependencies, and run the server.

use authgate::config::{Config, MIN_JWT_SECRET_LEN};
use authgate::db::{self, MemoryUserStore, PgUserStore, UserStore};
use authgate::{create_app, with_pages, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match config.jwt_secret.as_deref() {
        None => tracing::warn!("JWT_SECRET is not set; every login will fail"),
        Some(s) if s.len() < MIN_JWT_SECRET_LEN => {
            tracing::warn!(min = MIN_JWT_SECRET_LEN, "JWT_SECRET is shorter than recommended")
        }
        Some(_) => {}
    }

    let users: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("connected to database");
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using in-memory user store");
            Arc::new(MemoryUserStore::new())
        }
    };

    let state = AppState::new(&config, users)?;

    let app = with_pages(create_app(state), &config.static_dir);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
