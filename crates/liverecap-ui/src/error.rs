//! Error responses for pages and the JSON API
//!
//! Validation and empty-reference conditions are normally rendered inline by
//! the page handlers. What reaches these types is a page-level failure.

use askama::Template;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    Core(#[from] liverecap_core::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

fn status_for(err: &liverecap_core::Error) -> StatusCode {
    match err {
        liverecap_core::Error::Validation(_) | liverecap_core::Error::ReferenceListEmpty(_) => {
            StatusCode::BAD_REQUEST
        }
        liverecap_core::Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        liverecap_core::Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: &'a str,
    active: &'a str,
    message: String,
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let status = match &self {
            UiError::Core(err) => status_for(err),
            UiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Page failed with {}: {}", status, self);

        let page = ErrorTemplate {
            title: "Live Recap",
            active: "",
            message: self.to_string(),
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

/// JSON API error: `{"error": "..."}` with a status matching the cause
#[derive(Debug)]
pub struct ApiError(pub liverecap_core::Error);

impl From<liverecap_core::Error> for ApiError {
    fn from(err: liverecap_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!("API request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
