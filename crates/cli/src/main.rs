mod cli;
mod commands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stamps_core::{load_config, load_env_config, metrics, validate_config, Config};

use cli::{config_source, Cli, Command, LogFormat};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let (path, required) = config_source(explicit);

    if path.exists() || required {
        info!("Loading configuration from {:?}", path);
        load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
    } else {
        info!("No configuration file at {:?}, using defaults", path);
        load_env_config().context("Failed to load configuration from environment")
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = resolve_config(cli.config.as_deref())?;

    match &cli.command {
        Command::FetchCatalog(args) => args.apply(&mut config),
        Command::Generate(args) => args.apply(&mut config),
        Command::Preprocess(args) => args.apply(&mut config),
    }
    validate_config(&config).context("Configuration validation failed")?;

    let result = match cli.command {
        Command::FetchCatalog(_) => commands::fetch_catalog(&config).await,
        Command::Generate(_) => commands::generate(&config).await,
        Command::Preprocess(_) => commands::preprocess(&config).await,
    };

    if let Some(path) = &config.metrics.textfile {
        match metrics::write_textfile(path) {
            Ok(()) => info!("Wrote metrics to {:?}", path),
            Err(e) => warn!("Failed to write metrics to {:?}: {}", path, e),
        }
    }

    result
}
