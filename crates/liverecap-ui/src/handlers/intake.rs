//! Intake form handlers
//!
//! The form is only rendered when both reference lists have entries. A
//! successful submission redirects back to a fresh form, so inputs start from
//! their defaults again.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use liverecap_core::intake::{IntakeService, NewSession};
use liverecap_core::{Error, Result};
use serde::Deserialize;
use tracing::warn;

use crate::AppState;
use crate::error::UiError;
use crate::models::SelectOption;

#[derive(Template)]
#[template(path = "intake.html")]
struct IntakeTemplate {
    title: String,
    active: &'static str,
    warning: Option<String>,
    saved: bool,
    show_form: bool,
    host_options: Vec<SelectOption>,
    shop_options: Vec<SelectOption>,
    duration: i64,
    revenue: i64,
    video_count: i64,
}

impl IntakeTemplate {
    fn new(state: &AppState) -> Self {
        let defaults = NewSession::default();
        Self {
            title: state.config.title.clone(),
            active: "intake",
            warning: None,
            saved: false,
            show_form: false,
            host_options: Vec::new(),
            shop_options: Vec::new(),
            duration: defaults.duration_minutes,
            revenue: defaults.revenue,
            video_count: defaults.video_count,
        }
    }
}

fn choice_options(names: &[String], current: &str) -> Vec<SelectOption> {
    names
        .iter()
        .map(|n| SelectOption::new(n.as_str(), n.as_str(), n == current))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct IntakeQuery {
    #[serde(default)]
    saved: Option<String>,
}

/// Raw form fields. Numbers arrive as text so a bad value becomes an inline
/// warning instead of a rejected request.
#[derive(Debug, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    host: String,
    #[serde(default)]
    shop: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    revenue: String,
    #[serde(default)]
    video_count: String,
}

fn parse_number(raw: &str, field: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Validation(format!("{} must be a whole number", field)))
}

impl IntakeForm {
    fn to_new_session(&self) -> Result<NewSession> {
        Ok(NewSession {
            host: self.host.clone(),
            shop: self.shop.clone(),
            duration_minutes: parse_number(&self.duration, "Duration")?,
            revenue: parse_number(&self.revenue, "Revenue")?,
            video_count: parse_number(&self.video_count, "Video count")?,
        })
    }
}

pub async fn intake_form(
    State(state): State<AppState>,
    Query(query): Query<IntakeQuery>,
) -> std::result::Result<Html<String>, UiError> {
    let intake = IntakeService::new(state.store.clone(), state.clock.clone());
    let mut template = IntakeTemplate::new(&state);
    template.saved = query.saved.is_some();

    match intake.choices().await {
        Ok(lists) => {
            template.show_form = true;
            template.host_options = choice_options(&lists.hosts, "");
            template.shop_options = choice_options(&lists.shops, "");
        }
        Err(err) if err.is_user_facing() => template.warning = Some(err.to_string()),
        Err(err) => return Err(err.into()),
    }

    Ok(Html(template.render()?))
}

pub async fn intake_submit(
    State(state): State<AppState>,
    Form(form): Form<IntakeForm>,
) -> std::result::Result<Response, UiError> {
    let intake = IntakeService::new(state.store.clone(), state.clock.clone());

    let outcome = match form.to_new_session() {
        Ok(input) => intake.submit(input).await.map(|_| ()),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => Ok(Redirect::to("/intake?saved=1").into_response()),
        Err(err) if err.is_user_facing() => {
            warn!("Intake rejected: {}", err);
            let mut template = IntakeTemplate::new(&state);
            template.warning = Some(err.to_string());

            // Keep what was typed so the user can correct it
            if let Ok(lists) = intake.choices().await {
                template.show_form = true;
                template.host_options = choice_options(&lists.hosts, form.host.trim());
                template.shop_options = choice_options(&lists.shops, form.shop.trim());
                template.duration = parse_number(&form.duration, "").unwrap_or(template.duration);
                template.revenue = parse_number(&form.revenue, "").unwrap_or(template.revenue);
                template.video_count =
                    parse_number(&form.video_count, "").unwrap_or(template.video_count);
            }
            Ok(Html(template.render()?).into_response())
        }
        Err(err) => Err(err.into()),
    }
}
