#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Frog sighting map server binary.

use std::path::PathBuf;

use clap::Parser;
use frog_map_config::FrogMapConfig;

#[derive(Parser)]
#[command(name = "frog_map_server", about = "Frog sighting map server")]
struct Cli {
    /// TOML config file. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = FrogMapConfig::load(cli.config.as_deref())?;
    frog_map_server::run_server(config).await?;

    Ok(())
}
