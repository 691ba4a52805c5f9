//! CSV file data adapter.
//!
//! Loads one instrument file with a datetime index. Accepts canonical
//! `Date,Open,High,Low,Close,Volume` headers as well as the raw Dukascopy
//! export header (`Gmt time`, day-first timestamps); column names are matched
//! case-insensitively and canonicalized on load.

use crate::domain::error::FxlabError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;

const TIMESTAMP_COLUMNS: [&str; 4] = ["date", "gmt time", "datetime", "time"];
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S%.3f",
    "%d.%m.%Y %H:%M:%S",
];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self) -> Result<Vec<OhlcvBar>, FxlabError> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| FxlabError::Data {
            reason: format!("failed to open {}: {}", self.path.display(), e),
        })?;

        let headers = rdr
            .headers()
            .map_err(|e| FxlabError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let timestamp_col = find_column(&headers, &TIMESTAMP_COLUMNS)
            .ok_or_else(|| missing_column("date"))?;
        let open_col = find_column(&headers, &["open"]).ok_or_else(|| missing_column("open"))?;
        let high_col = find_column(&headers, &["high"]).ok_or_else(|| missing_column("high"))?;
        let low_col = find_column(&headers, &["low"]).ok_or_else(|| missing_column("low"))?;
        let close_col =
            find_column(&headers, &["close"]).ok_or_else(|| missing_column("close"))?;
        let volume_col =
            find_column(&headers, &["volume"]).ok_or_else(|| missing_column("volume"))?;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| FxlabError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp = parse_timestamp(field(&record, timestamp_col, row, "date")?)
                .ok_or_else(|| FxlabError::Data {
                    reason: format!(
                        "row {}: unrecognized timestamp '{}'",
                        row + 1,
                        record.get(timestamp_col).unwrap_or_default()
                    ),
                })?;

            bars.push(OhlcvBar {
                timestamp,
                open: parse_value(&record, open_col, row, "open")?,
                high: parse_value(&record, high_col, row, "high")?,
                low: parse_value(&record, low_col, row, "low")?,
                close: parse_value(&record, close_col, row, "close")?,
                volume: parse_value(&record, volume_col, row, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim().to_ascii_lowercase();
        names.iter().any(|name| header == *name)
    })
}

fn missing_column(name: &str) -> FxlabError {
    FxlabError::Data {
        reason: format!("missing {} column", name),
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    col: usize,
    row: usize,
    name: &str,
) -> Result<&'a str, FxlabError> {
    record.get(col).ok_or_else(|| FxlabError::Data {
        reason: format!("row {}: missing {} value", row + 1, name),
    })
}

fn parse_value(
    record: &csv::StringRecord,
    col: usize,
    row: usize,
    name: &str,
) -> Result<f64, FxlabError> {
    let raw = field(record, col, row, name)?;
    raw.trim().parse().map_err(|_| FxlabError::Data {
        reason: format!("row {}: invalid {} value '{}'", row + 1, name, raw),
    })
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
