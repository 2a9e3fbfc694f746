//! Domain types shared across Live Recap

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One logged live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub host: String,
    pub shop: String,
    pub duration_minutes: u32,
    pub revenue: u64,
    pub video_count: u32,
}

/// Which reference list an operation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Hosts,
    Shops,
}

impl ReferenceKind {
    /// Column of the setup table holding this list (1-based)
    pub fn column(self) -> usize {
        match self {
            ReferenceKind::Hosts => 1,
            ReferenceKind::Shops => 2,
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Hosts => write!(f, "hosts"),
            ReferenceKind::Shops => write!(f, "shops"),
        }
    }
}

/// Known host and shop names, in stored order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLists {
    pub hosts: Vec<String>,
    pub shops: Vec<String>,
}

impl ReferenceLists {
    pub fn get(&self, kind: ReferenceKind) -> &[String] {
        match kind {
            ReferenceKind::Hosts => &self.hosts,
            ReferenceKind::Shops => &self.shops,
        }
    }
}

/// Inclusive date range. A range whose end precedes its start contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Named shorthand resolving to a `DateRange`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    #[default]
    Today,
    #[serde(rename = "last7")]
    Last7Days,
    #[serde(rename = "month")]
    MonthToDate,
    #[serde(rename = "prev_month")]
    PreviousMonth,
    Custom,
}

impl RangePreset {
    pub const ALL: [RangePreset; 5] = [
        RangePreset::Today,
        RangePreset::Last7Days,
        RangePreset::MonthToDate,
        RangePreset::PreviousMonth,
        RangePreset::Custom,
    ];

    /// Token used in query strings
    pub fn as_str(self) -> &'static str {
        match self {
            RangePreset::Today => "today",
            RangePreset::Last7Days => "last7",
            RangePreset::MonthToDate => "month",
            RangePreset::PreviousMonth => "prev_month",
            RangePreset::Custom => "custom",
        }
    }

    /// Human readable label for selectors and headings
    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Today => "Today",
            RangePreset::Last7Days => "Last 7 days",
            RangePreset::MonthToDate => "This month",
            RangePreset::PreviousMonth => "Last month",
            RangePreset::Custom => "Custom",
        }
    }
}

impl FromStr for RangePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(RangePreset::Today),
            "last7" | "last_7_days" => Ok(RangePreset::Last7Days),
            "month" | "month_to_date" => Ok(RangePreset::MonthToDate),
            "prev_month" | "previous_month" => Ok(RangePreset::PreviousMonth),
            "custom" => Ok(RangePreset::Custom),
            other => Err(Error::Validation(format!("Unknown range preset '{}'", other))),
        }
    }
}

/// Dashboard filter. `None` on host or shop matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub range: DateRange,
    pub host: Option<String>,
    pub shop: Option<String>,
}

impl FilterCriteria {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            host: None,
            shop: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_shop(mut self, shop: impl Into<String>) -> Self {
        self.shop = Some(shop.into());
        self
    }

    pub fn matches(&self, record: &SessionRecord) -> bool {
        self.range.contains(record.date)
            && self.host.as_deref().is_none_or(|h| record.host == h)
            && self.shop.as_deref().is_none_or(|s| record.shop == s)
    }
}

/// Key used for grouping and ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Host,
    Shop,
}

impl GroupBy {
    pub fn key<'a>(self, record: &'a SessionRecord) -> &'a str {
        match self {
            GroupBy::Host => &record.host,
            GroupBy::Shop => &record.shop,
        }
    }
}

/// Revenue for one (date, shop) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub shop: String,
    pub revenue: u64,
}

/// Totals over a filtered record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_revenue: u64,
    pub total_video: u64,
    pub session_count: u64,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub key: String,
    pub revenue: u64,
}
