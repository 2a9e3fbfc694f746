//! Live Recap server
//!
//! Serves the live-session dashboard, the intake form and the setup page over
//! a Google Sheets spreadsheet (or an in-memory store for demos).
//!
//! Usage:
//! ```bash
//! # In-memory store, defaults
//! liverecap-server
//!
//! # With config file
//! liverecap-server --config config.yaml
//!
//! # Sheets backend from environment (env vars override config)
//! LIVERECAP_STORE=sheets \
//! LIVERECAP_SPREADSHEET_ID=1AbC... \
//! LIVERECAP_SHEETS_TOKEN=ya29... \
//!   liverecap-server --config config.yaml
//!
//! # Read both tables once and report
//! liverecap-server --config config.yaml check-store
//! ```

mod config;
mod store_factory;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{LoggingConfig, ServerConfig};
use liverecap_core::reference::read_reference_lists;
use liverecap_core::row::decode_records;
use liverecap_core::{RecordStore, SystemClock, Table};
use liverecap_ui::UiServer;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Live Recap - live-selling session dashboard
#[derive(Parser)]
#[command(name = "liverecap-server")]
#[command(about = "Dashboard and intake form for live-selling sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "LIVERECAP_CONFIG",
        global = true
    )]
    config: Option<String>,

    /// Address to bind (overrides config and LIVERECAP_HOST)
    #[arg(long, value_name = "HOST", global = true)]
    host: Option<String>,

    /// Port to bind (overrides config and LIVERECAP_PORT)
    #[arg(short, long, value_name = "PORT", global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default if no command specified)
    Serve,
    /// Read both tables once, report what was found and exit
    CheckStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => ServerConfig::from_file(config_path)
            .with_context(|| format!("Loading configuration from {}", config_path))?,
        None => ServerConfig::default(),
    };

    // Merge environment variables (they override config file)
    config.merge_env();

    // CLI flags have the highest precedence
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_tracing(&config.logging)?;

    match &cli.config {
        Some(path) => info!("📁 Loaded configuration from: {}", path),
        None => info!("📁 Using default configuration"),
    }

    config.validate()?;

    let store = store_factory::create_record_store(&config.store)?;

    match cli.command {
        Some(Commands::CheckStore) => check_store(store.as_ref()).await,
        Some(Commands::Serve) | None => {
            let server = UiServer::new(config.ui, store, Arc::new(SystemClock));
            server.serve(&config.host, config.port).await
        }
    }
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::new(format!("{}", log_level));

    // HTTP client internals stay at WARN unless asked for
    if !logging.log_http_client {
        for directive in ["hyper=warn", "hyper_util=warn", "reqwest=warn"] {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("Warning: Failed to set log filter '{}': {}", directive, e),
            }
        }
    }

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// One pass over both tables. Fails on an unreachable store or an unreadable row.
async fn check_store(store: &dyn RecordStore) -> anyhow::Result<()> {
    info!("🔎 Checking {} record store", store.backend_name());

    let lists = read_reference_lists(store)
        .await
        .context("Reading reference lists")?;
    let rows = store.read_all(Table::Data).await.context("Reading session data")?;
    let records = decode_records(&rows).context("Decoding session data")?;

    println!("Store:    {}", store.backend_name());
    println!("Hosts:    {}", lists.hosts.len());
    println!("Shops:    {}", lists.shops.len());
    println!("Sessions: {}", records.len());
    if let (Some(first), Some(last)) = (
        records.iter().map(|r| r.date).min(),
        records.iter().map(|r| r.date).max(),
    ) {
        println!("Dates:    {} to {}", first, last);
    }

    info!("✅ Record store is reachable");
    Ok(())
}
