//! Superchain API - HTTP server for the aggregated chain catalog

use anyhow::{Context, Result};
use clap::{Arg, Command};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use superchain_api::{build_router, ApiConfig, AppState};
use superchain_catalog::CatalogPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("superchain-api")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Superchain API - serve the aggregated chain catalog over HTTP")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config/default"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("Address to listen on, overrides server.bind_address"),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    init_logging(log_level);

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config/default");

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = config_path,
        "Starting Superchain API"
    );

    let mut config = ApiConfig::load_from(config_path).map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;
    if let Some(bind) = matches.get_one::<String>("bind") {
        config.server.bind_address = bind.clone();
        if let Err(e) = config.validate() {
            error!(bind = %bind, error = %e, "Invalid --bind address");
            return Err(e).context("Invalid --bind address");
        }
    }

    let pipeline = CatalogPipeline::new(config.catalog.clone()).context("Failed to build HTTP client")?;
    let state = AppState::new(pipeline, &config.server);
    if state.cache.is_enabled() {
        info!(ttl_seconds = config.server.cache_ttl_seconds, "Catalog cache enabled");
    }

    let app = build_router(state, config.server.allow_any_origin);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Superchain API stopped");
    Ok(())
}

fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid log level: {}. Using 'info'", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "superchain_api={level},superchain_catalog={level},tower_http=debug",
                    level = level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
