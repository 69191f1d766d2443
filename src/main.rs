//! Plant Catalog - paginated, filterable plant catalogue client
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing::info;

use catalog_api::HttpCollectionClient;
use catalog_app::config::{apply_env_overrides, init_config_dir, load_settings, CONFIG_DIR};

/// Plant Catalog - browse a remote plant collection page by page
#[derive(Parser, Debug)]
#[command(name = "plant-catalog")]
#[command(about = "Paginated, filterable plant catalogue client (NDJSON on stdout)", long_about = None)]
struct Args {
    /// Base URL of the API (overrides CATALOG_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory holding config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Write a default config.toml and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    catalog_core::logging::init().wrap_err("failed to initialize logging")?;

    let config_dir = args.config_dir.unwrap_or_else(|| PathBuf::from(CONFIG_DIR));

    if args.init_config {
        let path = init_config_dir(&config_dir)?;
        eprintln!("Config written to {}", path.display());
        return Ok(());
    }

    let mut settings = load_settings(&config_dir);
    apply_env_overrides(&mut settings);
    if let Some(url) = args.base_url {
        settings.api.base_url = url;
    }

    info!("Using API at {}", settings.api.base_url);
    let client = HttpCollectionClient::new(&settings.api.client_config())
        .wrap_err_with(|| format!("cannot use API at {}", settings.api.base_url))?;

    plant_catalog::run_headless(client, settings).await?;
    Ok(())
}
