//! Superchain Catalog - one-shot CLI
//!
//! Runs the aggregation pipeline once and writes the catalog as JSON to stdout.

use clap::{Arg, ArgAction, Command};
use std::io::Write;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use superchain_catalog::{
    config::CatalogConfig, error::Result, filter_by_name, find_group, CatalogError, CatalogPipeline,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("catalog")
        .version(superchain_catalog::VERSION)
        .about("Superchain Catalog - aggregate chain metadata into a ranked catalog")
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
            Arg::new("chain")
                .long("chain")
                .value_name("ID_OR_NAME")
                .help("Only print the group whose main network has this chain ID or name")
                .conflicts_with("search"),
        )
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .value_name("QUERY")
                .help("Only print groups whose main network name contains QUERY"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Logs go to stderr so stdout stays valid JSON
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
        version = superchain_catalog::VERSION,
        config_path = config_path,
        "Starting Superchain Catalog"
    );

    let config = CatalogConfig::load_from(config_path).map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    let pipeline = CatalogPipeline::new(config)?;
    let groups = pipeline.run().await?;

    let output = if let Some(key) = matches.get_one::<String>("chain") {
        let group = find_group(&groups, key)
            .ok_or_else(|| CatalogError::internal(format!("no chain matches '{}'", key)))?;
        serde_json::to_value(group)?
    } else if let Some(query) = matches.get_one::<String>("search") {
        serde_json::to_value(filter_by_name(&groups, query))?
    } else {
        serde_json::to_value(&groups)?
    };

    let mut stdout = std::io::stdout().lock();
    if matches.get_flag("pretty") {
        serde_json::to_writer_pretty(&mut stdout, &output)?;
    } else {
        serde_json::to_writer(&mut stdout, &output)?;
    }
    writeln!(stdout)?;

    Ok(())
}

/// Initialize logging with the specified level
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
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("superchain_catalog={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
