//! OHLCV bar representation.

use chrono::{NaiveDateTime, Timelike};

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// True when the bar's hour falls inside the inclusive trading window.
    pub fn within_hours(&self, start_hour: u32, end_hour: u32) -> bool {
        let h = self.hour();
        h >= start_hour && h <= end_hour
    }
}
