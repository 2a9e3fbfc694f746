//! Data models for templates and API responses

use chrono::NaiveDate;
use liverecap_core::types::{
    DateRange, FilterCriteria, RangePreset, RankEntry, Summary, TrendPoint,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dashboard filter parameters, shared by the page and the JSON API
///
/// Empty strings are what HTML forms send for untouched inputs and are
/// treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub preset: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub host: Option<String>,
    pub shop: Option<String>,
}

impl DashboardQuery {
    pub fn preset(&self) -> Option<&str> {
        non_blank(&self.preset)
    }

    pub fn start(&self) -> Option<&str> {
        non_blank(&self.start)
    }

    pub fn end(&self) -> Option<&str> {
        non_blank(&self.end)
    }

    pub fn host(&self) -> Option<&str> {
        non_blank(&self.host)
    }

    pub fn shop(&self) -> Option<&str> {
        non_blank(&self.shop)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Everything the dashboard shows for one filter
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub preset: RangePreset,
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub trend: Vec<TrendPoint>,
    pub top_hosts: Vec<RankEntry>,
    pub top_shops: Vec<RankEntry>,
    /// Distinct hosts present in the data, for the selector
    pub hosts: Vec<String>,
    /// Distinct shops present in the data, for the selector
    pub shops: Vec<String>,
}

/// `<option>` of a select element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Preset selector options with `current` marked
pub fn preset_options(current: RangePreset) -> Vec<SelectOption> {
    RangePreset::ALL
        .iter()
        .map(|p| SelectOption::new(p.as_str(), p.label(), *p == current))
        .collect()
}

/// Name selector with a leading "all" entry
pub fn name_options(all_label: &str, names: &[String], current: Option<&str>) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::new("", all_label, current.is_none())];
    options.extend(
        names
            .iter()
            .map(|n| SelectOption::new(n.as_str(), n.as_str(), current == Some(n.as_str()))),
    );
    options
}

/// Metric card
#[derive(Debug, Clone)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

pub fn metric_cards(summary: &Summary, currency_prefix: &str) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "💰 Total Revenue",
            value: format_currency(currency_prefix, summary.total_revenue),
        },
        MetricCard {
            label: "🎬 Total Videos",
            value: format_thousands(summary.total_video),
        },
        MetricCard {
            label: "📈 Total Sessions",
            value: format_thousands(summary.session_count),
        },
    ]
}

/// Leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub medal: &'static str,
    pub name: String,
    pub revenue: String,
}

pub const HOST_MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
pub const SHOP_MEDALS: [&str; 3] = ["⭐", "✨", "💫"];

pub fn leaderboard(entries: &[RankEntry], medals: &[&'static str], currency_prefix: &str) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardRow {
            rank: i + 1,
            medal: medals.get(i).copied().unwrap_or(""),
            name: entry.key.clone(),
            revenue: format_currency(currency_prefix, entry.revenue),
        })
        .collect()
}

/// Chart.js line chart payload: one dataset per shop over the union of dates
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendChart {
    pub labels: Vec<String>,
    pub datasets: Vec<TrendDataset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendDataset {
    pub label: String,
    pub data: Vec<Option<u64>>,
}

impl TrendChart {
    pub fn from_series(series: &[TrendPoint]) -> Self {
        let dates: Vec<NaiveDate> = series
            .iter()
            .map(|p| p.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let shops: BTreeSet<&str> = series.iter().map(|p| p.shop.as_str()).collect();

        let datasets = shops
            .into_iter()
            .map(|shop| TrendDataset {
                label: shop.to_string(),
                data: dates
                    .iter()
                    .map(|d| {
                        series
                            .iter()
                            .find(|p| p.date == *d && p.shop == shop)
                            .map(|p| p.revenue)
                    })
                    .collect(),
            })
            .collect();

        Self {
            labels: dates.iter().map(|d| d.to_string()).collect(),
            datasets,
        }
    }

    /// JSON safe to embed inside a `<script>` element
    pub fn to_embedded_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "{\"labels\":[],\"datasets\":[]}".to_string())
            .replace('<', "\\u003c")
    }
}

/// `Rp 150,000`
pub fn format_currency(prefix: &str, amount: u64) -> String {
    if prefix.is_empty() {
        format_thousands(amount)
    } else {
        format!("{} {}", prefix, format_thousands(amount))
    }
}

/// Group digits by three with `,`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn range_label(range: &DateRange) -> String {
    format!("{} to {}", range.start, range.end)
}
