//! Time-based resampling of bar sequences.
//!
//! An [`Interval`] is a pandas-style resampling rule: an optional count
//! followed by `D` (days), `H` (hours) or `T`/`MIN` (minutes). Resampling
//! projects the source bars onto a regular grid anchored at midnight of the
//! first bar's day; each grid point takes the first source bar at or after it
//! (backfill). The input slice is never mutated.

use crate::domain::error::FxlabError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::Duration;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Day,
    Hour,
    Minute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub count: u32,
    pub unit: IntervalUnit,
}

impl Interval {
    pub fn new(count: u32, unit: IntervalUnit) -> Self {
        Interval { count, unit }
    }

    pub fn duration(&self) -> Duration {
        match self.unit {
            IntervalUnit::Day => Duration::days(self.count as i64),
            IntervalUnit::Hour => Duration::hours(self.count as i64),
            IntervalUnit::Minute => Duration::minutes(self.count as i64),
        }
    }
}

impl FromStr for Interval {
    type Err = FxlabError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let rule = rule.trim();
        let digits_end = rule
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rule.len());

        let (count_str, unit_str) = rule.split_at(digits_end);
        let count = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse::<u32>()
                .map_err(|_| invalid_interval(rule))?
        };

        if count == 0 {
            return Err(invalid_interval(rule));
        }

        let unit = match unit_str.to_ascii_uppercase().as_str() {
            "D" => IntervalUnit::Day,
            "H" => IntervalUnit::Hour,
            "T" | "MIN" => IntervalUnit::Minute,
            _ => return Err(invalid_interval(rule)),
        };

        Ok(Interval { count, unit })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            IntervalUnit::Day => "D",
            IntervalUnit::Hour => "H",
            IntervalUnit::Minute => "T",
        };
        if self.count == 1 {
            write!(f, "{unit}")
        } else {
            write!(f, "{}{unit}", self.count)
        }
    }
}

fn invalid_interval(rule: &str) -> FxlabError {
    FxlabError::invalid_strategy(
        "interval",
        format!("unrecognized interval rule '{rule}', expected e.g. 'D', '4H' or '15T'"),
    )
}

/// Resample bars onto the interval grid using backfill.
///
/// The grid is anchored at midnight of the first bar's day, the first grid
/// point being the latest one at or before the first bar. Every grid point up
/// to the last bar's timestamp is populated with the first source bar at or
/// after it.
pub fn resample(bars: &[OhlcvBar], interval: Interval) -> Vec<OhlcvBar> {
    let (first, last) = match (bars.first(), bars.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Vec::new(),
    };

    let step = interval.duration();
    let step_secs = step.num_seconds();
    let day_start = first
        .timestamp
        .date()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time");
    let offset_secs = (first.timestamp - day_start).num_seconds();
    let mut grid = day_start + Duration::seconds((offset_secs / step_secs) * step_secs);

    let mut resampled = Vec::new();
    while grid <= last.timestamp {
        let idx = bars.partition_point(|b| b.timestamp < grid);
        let source = &bars[idx];
        resampled.push(OhlcvBar {
            timestamp: grid,
            ..source.clone()
        });
        grid += step;
    }

    resampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn bar(timestamp: NaiveDateTime, close: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn parse_plain_units() {
        assert_eq!(
            "D".parse::<Interval>().unwrap(),
            Interval::new(1, IntervalUnit::Day)
        );
        assert_eq!(
            "H".parse::<Interval>().unwrap(),
            Interval::new(1, IntervalUnit::Hour)
        );
        assert_eq!(
            "T".parse::<Interval>().unwrap(),
            Interval::new(1, IntervalUnit::Minute)
        );
        assert_eq!(
            "min".parse::<Interval>().unwrap(),
            Interval::new(1, IntervalUnit::Minute)
        );
    }

    #[test]
    fn parse_counted_units() {
        assert_eq!(
            "4H".parse::<Interval>().unwrap(),
            Interval::new(4, IntervalUnit::Hour)
        );
        assert_eq!(
            "15T".parse::<Interval>().unwrap(),
            Interval::new(15, IntervalUnit::Minute)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("W".parse::<Interval>().is_err());
        assert!("".parse::<Interval>().is_err());
        assert!("0H".parse::<Interval>().is_err());
        assert!("4X".parse::<Interval>().is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(Interval::new(1, IntervalUnit::Day).to_string(), "D");
        assert_eq!(Interval::new(4, IntervalUnit::Hour).to_string(), "4H");
        assert_eq!(Interval::new(15, IntervalUnit::Minute).to_string(), "15T");
    }

    #[test]
    fn resample_identity_on_aligned_bars() {
        let bars: Vec<OhlcvBar> = (0..5).map(|h| bar(ts(1, h, 0), h as f64)).collect();
        let out = resample(&bars, Interval::new(1, IntervalUnit::Hour));

        assert_eq!(out.len(), 5);
        for (a, b) in bars.iter().zip(&out) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn resample_backfills_missing_grid_points() {
        // Bars at 00:00 and 03:00; hourly grid gets 01:00 and 02:00 backfilled
        // from the 03:00 bar.
        let bars = vec![bar(ts(1, 0, 0), 1.0), bar(ts(1, 3, 0), 2.0)];
        let out = resample(&bars, Interval::new(1, IntervalUnit::Hour));

        assert_eq!(out.len(), 4);
        assert!((out[0].close - 1.0).abs() < f64::EPSILON);
        assert!((out[1].close - 2.0).abs() < f64::EPSILON);
        assert!((out[2].close - 2.0).abs() < f64::EPSILON);
        assert!((out[3].close - 2.0).abs() < f64::EPSILON);
        assert_eq!(out[1].timestamp, ts(1, 1, 0));
    }

    #[test]
    fn resample_downsamples_to_days() {
        let bars: Vec<OhlcvBar> = (0..48).map(|h| bar(ts(1 + h / 24, h % 24, 0), h as f64)).collect();
        let out = resample(&bars, Interval::new(1, IntervalUnit::Day));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timestamp, ts(1, 0, 0));
        assert_eq!(out[1].timestamp, ts(2, 0, 0));
        assert!((out[0].close - 0.0).abs() < f64::EPSILON);
        assert!((out[1].close - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resample_grid_is_anchored_at_day_start() {
        // First bar at 01:30; 1H grid floors to 01:00 from the day anchor.
        let bars = vec![bar(ts(1, 1, 30), 1.0), bar(ts(1, 3, 30), 2.0)];
        let out = resample(&bars, Interval::new(1, IntervalUnit::Hour));

        assert_eq!(out[0].timestamp, ts(1, 1, 0));
        // 01:00 backfills from the 01:30 bar.
        assert!((out[0].close - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn resample_empty_input() {
        let out = resample(&[], Interval::new(1, IntervalUnit::Day));
        assert!(out.is_empty());
    }

    #[test]
    fn resample_does_not_mutate_input() {
        let bars = vec![bar(ts(1, 0, 0), 1.0), bar(ts(1, 2, 0), 2.0)];
        let snapshot = bars.clone();
        let _ = resample(&bars, Interval::new(1, IntervalUnit::Hour));
        assert_eq!(bars, snapshot);
    }
}
