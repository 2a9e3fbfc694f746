//! Live Recap Web UI
//!
//! Embedded web dashboard over the session record store. All HTML templates
//! and custom JS/CSS are compiled into the binary. Chart.js is loaded from CDN.
//!
//! Pages:
//! - Dashboard: filtered revenue trend, totals and top-3 leaderboards
//! - Intake: log one live session
//! - Setup: add hosts and shops, list both

pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod server;

pub use server::{UiConfig, UiServer, build_router};

use liverecap_core::{Clock, RecordStore};
use std::sync::Arc;

/// Shared application state for the UI server
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub clock: Arc<dyn Clock>,
    pub config: UiConfig,
}
