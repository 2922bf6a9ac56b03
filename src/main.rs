use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use creator_api::app::{router, AppState};
use creator_api::config::AppConfig;
use creator_api::database::DatabaseManager;

#[derive(Parser)]
#[command(name = "creator-api")]
#[command(about = "Document-backed REST API with cursor-paginated lists")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Use the in-memory document store instead of PostgreSQL")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Creator API in {} mode", config.environment.as_str());

    let store = DatabaseManager::open(&config.database, &config.collections, cli.memory)
        .await
        .context("failed to open document store")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::load(config, store.clone())
        .await
        .context("failed to load reference data")?;
    if state.config.security.enable_login {
        tracing::warn!("Development login is enabled at /dev-login");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Closing document store");
    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating shutdown"),
    }
}
