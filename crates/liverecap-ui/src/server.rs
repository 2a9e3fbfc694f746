//! Web UI server implementation

use crate::AppState;
use crate::handlers;
use axum::{
    Router,
    routing::{get, post},
};
use liverecap_core::aggregate::DEFAULT_TOP_N;
use liverecap_core::{Clock, RecordStore};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Page title shown in the header
    #[serde(default = "default_title")]
    pub title: String,

    /// Prefix placed before formatted revenue (default: "Rp")
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,

    /// Leaderboard length (default: 3)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Days before today that a custom range starts at when no start is given
    #[serde(default = "default_custom_range_days")]
    pub custom_range_days: u64,
}

fn default_title() -> String {
    "Live Recap".to_string()
}

fn default_currency_prefix() -> String {
    "Rp".to_string()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_custom_range_days() -> u64 {
    30
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            currency_prefix: default_currency_prefix(),
            top_n: default_top_n(),
            custom_range_days: default_custom_range_days(),
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(handlers::dashboard::dashboard))
        .route(
            "/intake",
            get(handlers::intake::intake_form).post(handlers::intake::intake_submit),
        )
        .route("/setup", get(handlers::setup::setup_page))
        .route("/setup/hosts", post(handlers::setup::add_host))
        .route("/setup/shops", post(handlers::setup::add_shop))
        // Static assets (embedded in binary)
        .route("/static/css/style.css", get(handlers::static_files::serve_css))
        .route("/static/js/charts.js", get(handlers::static_files::serve_charts_js))
        // JSON API endpoints
        .route("/api/dashboard", get(handlers::api::dashboard))
        .route("/api/references", get(handlers::api::references))
        .route("/healthz", get(handlers::api::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// UI Server
pub struct UiServer {
    state: AppState,
}

impl UiServer {
    /// Create a new UI server
    pub fn new(config: UiConfig, store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: AppState {
                store,
                clock,
                config,
            },
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the UI server
    pub async fn serve(self, host: &str, port: u16) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

        let router = self.router();

        info!(
            "📊 {} starting on http://{} (store: {})",
            self.state.config.title,
            addr,
            self.state.store.backend_name()
        );
        info!("   Dashboard:  http://{}/", addr);
        info!("   Intake:     http://{}/intake", addr);
        info!("   Setup:      http://{}/setup", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
