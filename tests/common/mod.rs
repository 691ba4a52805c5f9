#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use fxlab::domain::error::FxlabError;
pub use fxlab::domain::ohlcv::OhlcvBar;
use fxlab::ports::data_port::DataPort;

pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn bar(timestamp: NaiveDateTime, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp,
        open: close,
        high: close + 0.02,
        low: close - 0.02,
        close,
        volume: 1000.0,
    }
}

/// One bar per hour starting at midnight, day rolling over after hour 23.
pub fn hourly_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| bar(ts(1 + (i / 24) as u32, (i % 24) as u32), close))
        .collect()
}

pub fn oscillating_bars(n: usize) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| 1.0 + 0.1 * ((i as f64) * 0.9).sin())
        .collect();
    hourly_bars(&closes)
}

pub struct MockDataPort {
    bars: Vec<OhlcvBar>,
}

impl MockDataPort {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self { bars }
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self) -> Result<Vec<OhlcvBar>, FxlabError> {
        Ok(self.bars.clone())
    }
}
