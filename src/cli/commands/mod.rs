//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod export;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings, LoadOptions};
use crate::models::ZoneClass;

#[derive(Parser, Debug)]
#[command(name = "zonequery")]
#[command(about = "Serve PostGIS zones as GeoJSON")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PostgreSQL connection URL (overrides config and DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Disable TLS for PostgreSQL connections
    #[arg(long, global = true)]
    no_tls: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind: port, host, or host:port [default: 127.0.0.1:8000]
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Print one zone class as a GeoJSON FeatureCollection
    Export {
        /// Zone class to export
        #[arg(value_enum)]
        class: ZoneClass,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Check database connectivity, PostGIS and the zone tables
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let bind = match &cli.command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let options = LoadOptions {
        config_path: cli.config,
        database_url: cli.database_url,
        no_tls: cli.no_tls,
        bind,
    };
    let settings = load_settings(options)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Serve { .. } => serve::cmd_serve(&settings).await,
        Commands::Export { class, pretty } => export::cmd_export(&settings, class, pretty).await,
        Commands::Check => check::cmd_check(&settings).await,
    }
}
