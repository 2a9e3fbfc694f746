//! JSON API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use liverecap_core::reference::read_reference_lists;
use liverecap_core::types::ReferenceLists;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{DashboardData, DashboardQuery};
use crate::{AppState, queries};

/// Dashboard aggregates for a filter
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardData>, ApiError> {
    let data = queries::dashboard_data(&state, &params).await?;
    Ok(Json(data))
}

/// Current host and shop lists
pub async fn references(State(state): State<AppState>) -> Result<Json<ReferenceLists>, ApiError> {
    let lists = read_reference_lists(state.store.as_ref()).await?;
    Ok(Json(lists))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub store: &'static str,
}

/// Liveness probe. Does not touch the store.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        store: state.store.backend_name(),
    })
}
