//! Dashboard page handler

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use liverecap_core::types::RangePreset;
use tracing::warn;

use crate::error::UiError;
use crate::models::{
    DashboardData, DashboardQuery, HOST_MEDALS, LeaderboardRow, MetricCard, SHOP_MEDALS,
    SelectOption, TrendChart, leaderboard, metric_cards, name_options, preset_options, range_label,
};
use crate::{AppState, queries};

const NO_DATA_WARNING: &str = "No data for this date range yet ✨";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    title: String,
    active: &'static str,
    preset_options: Vec<SelectOption>,
    custom: bool,
    start: String,
    end: String,
    host_options: Vec<SelectOption>,
    shop_options: Vec<SelectOption>,
    heading: String,
    range_label: String,
    warning: Option<String>,
    has_records: bool,
    chart_json: String,
    currency_prefix: String,
    metrics: Vec<MetricCard>,
    top_hosts: Vec<LeaderboardRow>,
    top_shops: Vec<LeaderboardRow>,
}

impl DashboardTemplate {
    fn from_data(state: &AppState, data: &DashboardData) -> Self {
        let prefix = &state.config.currency_prefix;
        let has_records = data.summary.session_count > 0;
        let range = &data.criteria.range;

        Self {
            title: state.config.title.clone(),
            active: "dashboard",
            preset_options: preset_options(data.preset),
            custom: data.preset == RangePreset::Custom,
            start: range.start.to_string(),
            end: range.end.to_string(),
            host_options: name_options("All hosts", &data.hosts, data.criteria.host.as_deref()),
            shop_options: name_options("All shops", &data.shops, data.criteria.shop.as_deref()),
            heading: data.preset.label().to_string(),
            range_label: range_label(range),
            warning: (!has_records).then(|| NO_DATA_WARNING.to_string()),
            has_records,
            chart_json: TrendChart::from_series(&data.trend).to_embedded_json(),
            currency_prefix: prefix.clone(),
            metrics: metric_cards(&data.summary, prefix),
            top_hosts: leaderboard(&data.top_hosts, &HOST_MEDALS, prefix),
            top_shops: leaderboard(&data.top_shops, &SHOP_MEDALS, prefix),
        }
    }

    /// Controls only, echoing the submitted filter, with the problem shown inline
    fn invalid_filter(state: &AppState, params: &DashboardQuery, message: String) -> Self {
        let preset = params
            .preset()
            .and_then(|p| p.parse::<RangePreset>().ok())
            .unwrap_or_default();
        let echo = |value: Option<&str>| value.map(|v| vec![v.to_string()]).unwrap_or_default();

        Self {
            title: state.config.title.clone(),
            active: "dashboard",
            preset_options: preset_options(preset),
            custom: preset == RangePreset::Custom,
            start: params.start().unwrap_or_default().to_string(),
            end: params.end().unwrap_or_default().to_string(),
            host_options: name_options("All hosts", &echo(params.host()), params.host()),
            shop_options: name_options("All shops", &echo(params.shop()), params.shop()),
            heading: preset.label().to_string(),
            range_label: String::new(),
            warning: Some(message),
            has_records: false,
            chart_json: TrendChart::default().to_embedded_json(),
            currency_prefix: state.config.currency_prefix.clone(),
            metrics: Vec::new(),
            top_hosts: Vec::new(),
            top_shops: Vec::new(),
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Html<String>, UiError> {
    let template = match queries::dashboard_data(&state, &params).await {
        Ok(data) => DashboardTemplate::from_data(&state, &data),
        Err(err) if err.is_user_facing() => {
            warn!("Dashboard filter rejected: {}", err);
            DashboardTemplate::invalid_filter(&state, &params, err.to_string())
        }
        Err(err) => return Err(err.into()),
    };
    Ok(Html(template.render()?))
}
