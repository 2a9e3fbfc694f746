//! Positional row layout of the store tables
//!
//! Data table: `[date "YYYY-MM-DD", host, shop, duration, revenue, video_count]`.
//! Setup table: hosts in column 1, shops in column 2.

use chrono::NaiveDate;

use crate::record_store::CellValue;
use crate::types::SessionRecord;
use crate::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DATA_HEADER: [&str; 6] = ["Date", "Host", "Shop", "Duration", "Revenue", "Videos"];
pub const SETUP_HEADER: [&str; 2] = ["Host", "Shop"];

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Largest revenue a data cell can hold
pub const MAX_REVENUE: u64 = i64::MAX as u64;

/// Encode a record in data-table column order
///
/// # Errors
/// `Error::Validation` if revenue exceeds `MAX_REVENUE`.
pub fn encode_record(record: &SessionRecord) -> Result<Vec<CellValue>> {
    let revenue = i64::try_from(record.revenue)
        .map_err(|_| Error::Validation(format!("Revenue {} is out of range", record.revenue)))?;
    Ok(vec![
        CellValue::Text(format_date(record.date)),
        CellValue::Text(record.host.clone()),
        CellValue::Text(record.shop.clone()),
        CellValue::Integer(i64::from(record.duration_minutes)),
        CellValue::Integer(revenue),
        CellValue::Integer(i64::from(record.video_count)),
    ])
}

/// Decode every data row, skipping the header and fully blank rows
///
/// # Errors
/// `Error::Validation` naming the spreadsheet row of the first malformed cell.
pub fn decode_records(rows: &[Vec<String>]) -> Result<Vec<SessionRecord>> {
    rows.iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
        .map(|(i, row)| decode_record(row).map_err(|e| at_row(e, i + 1)))
        .collect()
}

fn at_row(err: Error, row_number: usize) -> Error {
    match err {
        Error::Validation(msg) => Error::Validation(format!("Row {}: {}", row_number, msg)),
        other => other,
    }
}

fn decode_record(row: &[String]) -> Result<SessionRecord> {
    let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");

    let host = cell(1);
    let shop = cell(2);
    if host.is_empty() || shop.is_empty() {
        return Err(Error::Validation("host and shop are required".to_string()));
    }

    Ok(SessionRecord {
        date: parse_date(cell(0))?,
        host: host.to_string(),
        shop: shop.to_string(),
        duration_minutes: parse_count(cell(3), "duration")?,
        revenue: parse_count::<i64>(cell(4), "revenue")?.unsigned_abs(),
        video_count: parse_count(cell(5), "video count")?,
    })
}

/// Parse a non-negative integer cell, tolerating `,` thousands separators
fn parse_count<T: TryFrom<u64>>(raw: &str, field: &str) -> Result<T> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let value = if cleaned.is_empty() {
        0
    } else {
        cleaned
            .parse::<u64>()
            .map_err(|_| Error::Validation(format!("Invalid {} '{}'", field, raw)))?
    };
    T::try_from(value).map_err(|_| Error::Validation(format!("{} '{}' is out of range", field, raw)))
}

/// Reference list entries from a setup column: header and blank cells dropped
pub fn reference_entries(column: Vec<String>) -> Vec<String> {
    column
        .into_iter()
        .skip(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&DATA_HEADER)
    }

    #[test]
    fn test_encode_layout() {
        let record = SessionRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            host: "Ann".to_string(),
            shop: "ShopA".to_string(),
            duration_minutes: 30,
            revenue: 100_000,
            video_count: 2,
        };
        let cells = encode_record(&record).unwrap();
        assert_eq!(cells[0], CellValue::Text("2024-06-01".to_string()));
        assert_eq!(cells[4], CellValue::Integer(100_000));
        assert_eq!(cells.len(), DATA_HEADER.len());
    }

    #[test]
    fn test_decode_skips_header_and_blank_rows() {
        let rows = vec![
            header(),
            row(&["2024-06-01", "Ann", "ShopA", "30", "100000", "2"]),
            row(&["", "", ""]),
            row(&["2024-06-02", "Bea", "ShopB", "10", "1,250,000", "0"]),
        ];
        let records = decode_records(&rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].revenue, 1_250_000);
    }

    #[test]
    fn test_decode_tolerates_missing_trailing_cells() {
        let rows = vec![header(), row(&["2024-06-01", "Ann", "ShopA", "30"])];
        let records = decode_records(&rows).unwrap();
        assert_eq!(records[0].revenue, 0);
        assert_eq!(records[0].video_count, 0);
    }

    #[test]
    fn test_decode_reports_row_number() {
        let rows = vec![
            header(),
            row(&["2024-06-01", "Ann", "ShopA", "30", "100", "1"]),
            row(&["06/02/2024", "Ann", "ShopA", "30", "100", "1"]),
        ];
        let err = decode_records(&rows).unwrap_err();
        match err {
            Error::Validation(msg) => assert!(msg.starts_with("Row 3:"), "got {}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_negative_revenue() {
        let rows = vec![header(), row(&["2024-06-01", "Ann", "ShopA", "30", "-5", "1"])];
        assert!(matches!(decode_records(&rows), Err(Error::Validation(_))));
    }

    #[test]
    fn test_reference_entries_drop_header_and_blanks() {
        let column = row(&["Host", "Ann", "", "  ", "Bea "]);
        assert_eq!(reference_entries(column), vec!["Ann", "Bea"]);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
        assert_eq!(
            parse_date(" 2024-02-29 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_revenue_beyond_cell_range_rejected() {
        let max = u64::MAX.to_string();
        let rows = vec![
            header(),
            row(&["2024-06-01", "Ann", "ShopA", "10", &max, "0"]),
            row(&["2024-06-01", "Bea", "ShopA", "10", &max, "0"]),
        ];
        let err = decode_records(&rows).unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.starts_with("Row 2:")));

        let largest = MAX_REVENUE.to_string();
        let rows = vec![header(), row(&["2024-06-01", "Ann", "ShopA", "10", &largest, "0"])];
        assert_eq!(decode_records(&rows).unwrap()[0].revenue, MAX_REVENUE);
    }

    #[test]
    fn test_encode_rejects_oversized_revenue() {
        let record = SessionRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            host: "Ann".to_string(),
            shop: "ShopA".to_string(),
            duration_minutes: 30,
            revenue: MAX_REVENUE + 1,
            video_count: 0,
        };
        assert!(matches!(encode_record(&record), Err(Error::Validation(_))));
    }
}
