//! Store reads feeding the dashboard
//!
//! Every call reads the full record set fresh; nothing is cached between
//! requests.

use chrono::{Days, NaiveDate};
use liverecap_core::aggregate::{
    distinct_values, filter_records, resolve_range, summary, top_n, trend_series,
};
use liverecap_core::row::{decode_records, parse_date};
use liverecap_core::types::{FilterCriteria, GroupBy, RangePreset, SessionRecord};
use liverecap_core::{RecordStore, Result, Table};
use tracing::debug;

use crate::AppState;
use crate::models::{DashboardData, DashboardQuery};

/// Read and decode every session record
pub async fn load_records(store: &dyn RecordStore) -> Result<Vec<SessionRecord>> {
    let rows = store.read_all(Table::Data).await?;
    let records = decode_records(&rows)?;
    debug!("Loaded {} session records", records.len());
    Ok(records)
}

/// Turn query parameters into a preset and filter
///
/// A custom range falls back to `[today - custom_range_days, today]` for any
/// bound left empty, the same defaults the date inputs start with.
pub fn resolve_criteria(
    params: &DashboardQuery,
    today: NaiveDate,
    custom_range_days: u64,
) -> Result<(RangePreset, FilterCriteria)> {
    let preset = match params.preset() {
        Some(token) => token.parse::<RangePreset>()?,
        None => RangePreset::default(),
    };

    let (custom_start, custom_end) = if preset == RangePreset::Custom {
        let start = match params.start() {
            Some(raw) => parse_date(raw)?,
            None => today
                .checked_sub_days(Days::new(custom_range_days))
                .unwrap_or(today),
        };
        let end = match params.end() {
            Some(raw) => parse_date(raw)?,
            None => today,
        };
        (Some(start), Some(end))
    } else {
        (None, None)
    };

    let range = resolve_range(preset, today, custom_start, custom_end)?;
    Ok((
        preset,
        FilterCriteria {
            range,
            host: params.host().map(str::to_string),
            shop: params.shop().map(str::to_string),
        },
    ))
}

/// Everything the dashboard shows for `params`
pub async fn dashboard_data(state: &AppState, params: &DashboardQuery) -> Result<DashboardData> {
    let records = load_records(state.store.as_ref()).await?;
    let (preset, criteria) =
        resolve_criteria(params, state.clock.today(), state.config.custom_range_days)?;

    let subset = filter_records(&records, &criteria);
    debug!(
        "Dashboard filter {:?} matched {} of {} records",
        criteria,
        subset.len(),
        records.len()
    );

    Ok(DashboardData {
        preset,
        summary: summary(&subset),
        trend: trend_series(&subset),
        top_hosts: top_n(&subset, GroupBy::Host, state.config.top_n),
        top_shops: top_n(&subset, GroupBy::Shop, state.config.top_n),
        hosts: distinct_values(&records, GroupBy::Host),
        shops: distinct_values(&records, GroupBy::Shop),
        criteria,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use liverecap_core::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(preset: &str) -> DashboardQuery {
        DashboardQuery {
            preset: Some(preset.to_string()),
            ..DashboardQuery::default()
        }
    }

    #[test]
    fn test_default_preset_is_today() {
        let today = date(2024, 6, 15);
        let (preset, criteria) = resolve_criteria(&DashboardQuery::default(), today, 30).unwrap();
        assert_eq!(preset, RangePreset::Today);
        assert_eq!(criteria.range.start, today);
        assert!(criteria.host.is_none());
    }

    #[test]
    fn test_custom_defaults_to_last_thirty_days() {
        let today = date(2024, 6, 15);
        let (_, criteria) = resolve_criteria(&query("custom"), today, 30).unwrap();
        assert_eq!(criteria.range.start, date(2024, 5, 16));
        assert_eq!(criteria.range.end, today);
    }

    #[test]
    fn test_custom_bounds_parsed() {
        let mut params = query("custom");
        params.start = Some("2024-06-10".to_string());
        params.end = Some("2024-06-01".to_string());
        let (_, criteria) = resolve_criteria(&params, date(2024, 6, 15), 30).unwrap();
        assert!(criteria.range.is_empty());
    }

    #[test]
    fn test_malformed_inputs_are_validation_errors() {
        let mut params = query("custom");
        params.start = Some("10/06/2024".to_string());
        assert!(matches!(
            resolve_criteria(&params, date(2024, 6, 15), 30),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            resolve_criteria(&query("fortnight"), date(2024, 6, 15), 30),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_bounds_ignored_outside_custom() {
        let mut params = query("month");
        params.start = Some("not-a-date".to_string());
        let (_, criteria) = resolve_criteria(&params, date(2024, 6, 15), 30).unwrap();
        assert_eq!(criteria.range.start, date(2024, 6, 1));
    }
}
