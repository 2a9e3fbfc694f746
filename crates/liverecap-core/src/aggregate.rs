//! Dashboard aggregation
//!
//! Pure functions turning the full record set plus a `FilterCriteria` into the
//! dashboard outputs: a per-day-per-shop revenue series, summary totals and
//! top-N leaderboards. Nothing here touches the store or the clock.

use chrono::{Datelike, Days, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::types::{
    DateRange, FilterCriteria, GroupBy, RangePreset, RankEntry, SessionRecord, Summary,
    TrendPoint,
};
use crate::{Error, Result};

/// Leaderboard length used by the dashboard
pub const DEFAULT_TOP_N: usize = 3;

/// Resolve a preset to concrete bounds relative to `today`
///
/// Custom bounds are taken as given. An end before the start is not swapped
/// and yields an empty range.
///
/// # Errors
/// `Error::Validation` when a custom range lacks a bound or date arithmetic
/// leaves the calendar.
pub fn resolve_range(
    preset: RangePreset,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Result<DateRange> {
    let out_of_range = || Error::Validation(format!("Date out of range near {}", today));

    match preset {
        RangePreset::Today => Ok(DateRange::new(today, today)),
        RangePreset::Last7Days => {
            let start = today.checked_sub_days(Days::new(7)).ok_or_else(out_of_range)?;
            Ok(DateRange::new(start, today))
        }
        RangePreset::MonthToDate => {
            let start = today.with_day(1).ok_or_else(out_of_range)?;
            Ok(DateRange::new(start, today))
        }
        RangePreset::PreviousMonth => {
            let end = today
                .with_day(1)
                .and_then(|first| first.pred_opt())
                .ok_or_else(out_of_range)?;
            let start = end.with_day(1).ok_or_else(out_of_range)?;
            Ok(DateRange::new(start, end))
        }
        RangePreset::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)),
            _ => Err(Error::Validation(
                "Custom range needs both a start and an end date".to_string(),
            )),
        },
    }
}

/// Records matching `criteria`, in input order
pub fn filter_records(records: &[SessionRecord], criteria: &FilterCriteria) -> Vec<SessionRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Revenue summed per (date, shop), ordered by date then shop
///
/// Sums here and in `summary` and `top_n` saturate at `u64::MAX`.
pub fn trend_series(subset: &[SessionRecord]) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<(NaiveDate, &str), u64> = BTreeMap::new();
    for record in subset {
        let total = groups.entry((record.date, record.shop.as_str())).or_default();
        *total = total.saturating_add(record.revenue);
    }

    groups
        .into_iter()
        .map(|((date, shop), revenue)| TrendPoint {
            date,
            shop: shop.to_string(),
            revenue,
        })
        .collect()
}

pub fn summary(subset: &[SessionRecord]) -> Summary {
    subset.iter().fold(Summary::default(), |mut acc, r| {
        acc.total_revenue = acc.total_revenue.saturating_add(r.revenue);
        acc.total_video = acc.total_video.saturating_add(u64::from(r.video_count));
        acc.session_count += 1;
        acc
    })
}

/// Top `n` keys by summed revenue
///
/// Sorted by revenue descending. Equal revenue is ordered by key ascending so
/// the leaderboard is stable across requests.
pub fn top_n(subset: &[SessionRecord], group_by: GroupBy, n: usize) -> Vec<RankEntry> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for record in subset {
        let total = totals.entry(group_by.key(record)).or_default();
        *total = total.saturating_add(record.revenue);
    }

    let mut ranked: Vec<RankEntry> = totals
        .into_iter()
        .map(|(key, revenue)| RankEntry {
            key: key.to_string(),
            revenue,
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(n);
    ranked
}

/// Sorted distinct hosts or shops present in `records`
pub fn distinct_values(records: &[SessionRecord], group_by: GroupBy) -> Vec<String> {
    records
        .iter()
        .map(|r| group_by.key(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, host: &str, shop: &str, revenue: u64, videos: u32) -> SessionRecord {
        SessionRecord {
            date: d,
            host: host.to_string(),
            shop: shop.to_string(),
            duration_minutes: 10,
            revenue,
            video_count: videos,
        }
    }

    fn scenario() -> Vec<SessionRecord> {
        vec![
            SessionRecord {
                date: date(2024, 6, 1),
                host: "Ann".to_string(),
                shop: "ShopA".to_string(),
                duration_minutes: 30,
                revenue: 100_000,
                video_count: 2,
            },
            SessionRecord {
                date: date(2024, 6, 1),
                host: "Bea".to_string(),
                shop: "ShopA".to_string(),
                duration_minutes: 20,
                revenue: 50_000,
                video_count: 1,
            },
            SessionRecord {
                date: date(2024, 6, 2),
                host: "Ann".to_string(),
                shop: "ShopB".to_string(),
                duration_minutes: 10,
                revenue: 0,
                video_count: 0,
            },
        ]
    }

    fn mixed() -> Vec<SessionRecord> {
        vec![
            record(date(2024, 5, 30), "Ann", "ShopA", 10, 1),
            record(date(2024, 6, 1), "Bea", "ShopB", 20, 0),
            record(date(2024, 6, 1), "Cia", "ShopA", 30, 3),
            record(date(2024, 6, 3), "Ann", "ShopB", 40, 2),
            record(date(2024, 6, 3), "Dee", "ShopC", 50, 1),
            record(date(2024, 6, 3), "Ann", "ShopB", 60, 4),
            record(date(2024, 6, 9), "Bea", "ShopA", 70, 0),
        ]
    }

    #[test]
    fn test_resolve_today() {
        let today = date(2024, 6, 15);
        let range = resolve_range(RangePreset::Today, today, None, None).unwrap();
        assert_eq!(range, DateRange::new(today, today));
    }

    #[test]
    fn test_resolve_last_7_days_spans_eight_dates() {
        let range = resolve_range(RangePreset::Last7Days, date(2024, 3, 3), None, None).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 2, 25), date(2024, 3, 3)));
    }

    #[test]
    fn test_resolve_month_to_date() {
        let range = resolve_range(RangePreset::MonthToDate, date(2024, 6, 15), None, None).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 6, 1), date(2024, 6, 15)));
    }

    #[test]
    fn test_resolve_previous_month_leap_year() {
        let range =
            resolve_range(RangePreset::PreviousMonth, date(2024, 3, 15), None, None).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_resolve_previous_month_across_year() {
        let range = resolve_range(RangePreset::PreviousMonth, date(2025, 1, 1), None, None).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 12, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_resolve_custom_keeps_inverted_bounds() {
        let start = date(2024, 6, 10);
        let end = date(2024, 6, 1);
        let range = resolve_range(RangePreset::Custom, date(2024, 6, 15), Some(start), Some(end))
            .unwrap();
        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
        assert!(filter_records(&mixed(), &FilterCriteria::new(range)).is_empty());
    }

    #[test]
    fn test_resolve_custom_requires_both_bounds() {
        let result = resolve_range(RangePreset::Custom, date(2024, 6, 15), Some(date(2024, 6, 1)), None);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_filter_subset_within_range() {
        let records = mixed();
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 3));
        let subset = filter_records(&records, &FilterCriteria::new(range));

        assert_eq!(subset.len(), 5);
        for r in &subset {
            assert!(records.contains(r));
            assert!(range.start <= r.date && r.date <= range.end);
        }
    }

    #[test]
    fn test_filter_preserves_input_order() {
        let records = mixed();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        let subset = filter_records(&records, &FilterCriteria::new(range).with_host("Ann"));
        let revenues: Vec<u64> = subset.iter().map(|r| r.revenue).collect();
        assert_eq!(revenues, vec![10, 40, 60]);
    }

    #[test]
    fn test_filter_host_and_shop_combine() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 12, 31));
        let criteria = FilterCriteria::new(range).with_host("Ann").with_shop("ShopB");
        let subset = filter_records(&mixed(), &criteria);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.host == "Ann" && r.shop == "ShopB"));
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(
            summary(&[]),
            Summary {
                total_revenue: 0,
                total_video: 0,
                session_count: 0
            }
        );
    }

    #[test]
    fn test_summary_order_independent() {
        let records = mixed();
        let mut reversed = records.clone();
        reversed.reverse();
        let mut rotated = records.clone();
        rotated.rotate_left(3);

        assert_eq!(summary(&records), summary(&reversed));
        assert_eq!(summary(&records), summary(&rotated));
    }

    #[test]
    fn test_trend_one_row_per_date_shop_pair() {
        let records = mixed();
        let series = trend_series(&records);

        let pairs: BTreeSet<(NaiveDate, String)> =
            records.iter().map(|r| (r.date, r.shop.clone())).collect();
        assert_eq!(series.len(), pairs.len());

        let total: u64 = series.iter().map(|p| p.revenue).sum();
        assert_eq!(total, summary(&records).total_revenue);

        let merged = series
            .iter()
            .find(|p| p.date == date(2024, 6, 3) && p.shop == "ShopB")
            .unwrap();
        assert_eq!(merged.revenue, 100);
    }

    #[test]
    fn test_trend_empty() {
        assert!(trend_series(&[]).is_empty());
    }

    #[test]
    fn test_top_n_properties() {
        let records = mixed();
        let top = top_n(&records, GroupBy::Host, 3);

        assert!(top.len() <= 3);
        for pair in top.windows(2) {
            assert!(pair[0].revenue >= pair[1].revenue);
        }
        let hosts = distinct_values(&records, GroupBy::Host);
        assert!(top.iter().all(|e| hosts.contains(&e.key)));
        assert_eq!(top[0].key, "Ann");
        assert_eq!(top[0].revenue, 110);
    }

    #[test]
    fn test_top_n_ties_break_by_key() {
        let d = date(2024, 6, 1);
        let records = vec![
            record(d, "Zed", "ShopA", 50, 0),
            record(d, "Amy", "ShopA", 50, 0),
            record(d, "Max", "ShopA", 50, 0),
            record(d, "Bob", "ShopA", 50, 0),
        ];
        let top = top_n(&records, GroupBy::Host, 3);
        let keys: Vec<&str> = top.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Amy", "Bob", "Max"]);
    }

    #[test]
    fn test_scenario_summary_and_leaderboards() {
        let records = scenario();
        let range = DateRange::new(date(2024, 6, 1), date(2024, 6, 2));
        let subset = filter_records(&records, &FilterCriteria::new(range));

        assert_eq!(
            summary(&subset),
            Summary {
                total_revenue: 150_000,
                total_video: 3,
                session_count: 3
            }
        );

        let hosts = top_n(&subset, GroupBy::Host, DEFAULT_TOP_N);
        assert_eq!(
            hosts,
            vec![
                RankEntry {
                    key: "Ann".to_string(),
                    revenue: 100_000
                },
                RankEntry {
                    key: "Bea".to_string(),
                    revenue: 50_000
                },
            ]
        );

        let shops = top_n(&subset, GroupBy::Shop, DEFAULT_TOP_N);
        assert_eq!(shops[0].key, "ShopA");
        assert_eq!(shops[1].revenue, 0);
    }

    #[test]
    fn test_distinct_values_sorted() {
        assert_eq!(
            distinct_values(&mixed(), GroupBy::Shop),
            vec!["ShopA", "ShopB", "ShopC"]
        );
    }

    #[test]
    fn test_huge_revenue_sums_saturate() {
        let day = date(2024, 6, 1);
        let records = vec![
            record(day, "Ann", "ShopA", u64::MAX, 0),
            record(day, "Bea", "ShopA", u64::MAX, 0),
            record(day, "Ann", "ShopB", 5, 0),
        ];

        assert_eq!(summary(&records).total_revenue, u64::MAX);
        assert_eq!(summary(&records).session_count, 3);

        let trend = trend_series(&records);
        assert_eq!(trend[0].shop, "ShopA");
        assert_eq!(trend[0].revenue, u64::MAX);

        let top = top_n(&records, GroupBy::Host, 3);
        assert_eq!(top[0].revenue, u64::MAX);
        assert_eq!(top[1].revenue, u64::MAX);
        assert_eq!(top[0].key, "Ann");
    }
}
