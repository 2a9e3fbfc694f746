//! Setup page handlers: add hosts and shops, list both

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{Html, Redirect},
};
use liverecap_core::reference::{ReferenceAdmin, numbered};
use serde::Deserialize;

use crate::AppState;
use crate::error::UiError;

#[derive(Template)]
#[template(path = "setup.html")]
struct SetupTemplate {
    title: String,
    active: &'static str,
    notice: Option<String>,
    hosts: Vec<(usize, String)>,
    shops: Vec<(usize, String)>,
}

#[derive(Debug, Deserialize)]
pub struct SetupQuery {
    added: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    name: String,
}

fn notice_for(added: Option<&str>) -> Option<String> {
    match added {
        Some("host") => Some("Host added!".to_string()),
        Some("shop") => Some("Shop added!".to_string()),
        _ => None,
    }
}

pub async fn setup_page(
    State(state): State<AppState>,
    Query(query): Query<SetupQuery>,
) -> Result<Html<String>, UiError> {
    let admin = ReferenceAdmin::new(state.store.clone());
    let lists = admin.lists().await?;

    let template = SetupTemplate {
        title: state.config.title.clone(),
        active: "setup",
        notice: notice_for(query.added.as_deref()),
        hosts: numbered(&lists.hosts),
        shops: numbered(&lists.shops),
    };
    Ok(Html(template.render()?))
}

pub async fn add_host(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Result<Redirect, UiError> {
    let admin = ReferenceAdmin::new(state.store.clone());
    if admin.add_host(&form.name).await? {
        Ok(Redirect::to("/setup?added=host"))
    } else {
        Ok(Redirect::to("/setup"))
    }
}

pub async fn add_shop(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> Result<Redirect, UiError> {
    let admin = ReferenceAdmin::new(state.store.clone());
    if admin.add_shop(&form.name).await? {
        Ok(Redirect::to("/setup?added=shop"))
    } else {
        Ok(Redirect::to("/setup"))
    }
}
