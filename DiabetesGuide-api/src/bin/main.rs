use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use diabetes_guide_api::api::create_application;
use diabetes_guide_api::config::ServerConfig;
use diabetes_guide_data::database::{self, DatabaseConfig};

/// Entry point for the DiabetesGuide API server.
///
/// Loads `.env`, installs tracing, prepares the data directory and the
/// SQLite pool, then serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(false)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stdout))
        .with(env_filter)
        .init();

    if !dotenv_loaded {
        info!(".env file not found, using process environment");
    }

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    info!("Starting DiabetesGuide API server ({})", config.environment);

    if !config.data_dir.exists() {
        info!("Creating data directory: {}", config.data_dir.display());
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("failed to create data directory {}", config.data_dir.display()))?;
    }

    let mut db_config = DatabaseConfig::from_env().context("invalid database configuration")?;
    if std::env::var("DB_SQLITE_PATH").is_err() {
        db_config.sqlite_path = Some(config.sqlite_path().to_string_lossy().to_string());
    }

    // Without a pool the repository keeps profiles in memory
    match database::initialize_database_pool_with(&db_config) {
        Ok(()) => info!("Database pool initialized"),
        Err(e) => error!("Failed to initialize database pool, using in-memory storage: {}", e),
    }
    if let Some(info) = database::get_connection_info() {
        info!("{}", info);
    }

    let app = create_application().await;

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
