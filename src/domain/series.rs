//! Bar-aligned value series with explicit warm-up handling.
//!
//! Every derived series (indicators, returns) is aligned 1:1 with its bar
//! sequence. Points inside a warm-up window, or produced by an indeterminate
//! calculation (flat stochastic range), carry `valid: false` and compare as
//! undefined everywhere downstream.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: f64,
}

impl SeriesPoint {
    pub fn defined(timestamp: NaiveDateTime, value: f64) -> Self {
        SeriesPoint {
            timestamp,
            valid: true,
            value,
        }
    }

    pub fn undefined(timestamp: NaiveDateTime) -> Self {
        SeriesPoint {
            timestamp,
            valid: false,
            value: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn defined_point() {
        let p = SeriesPoint::defined(ts(), 1.5);
        assert!(p.valid);
        assert!((p.value - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn undefined_point_carries_no_value() {
        let p = SeriesPoint::undefined(ts());
        assert!(!p.valid);
        assert!((p.value - 0.0).abs() < f64::EPSILON);
    }
}
