//! Simple Moving Average indicator.
//!
//! Trailing arithmetic mean of the close over `period` bars. Warmup: first
//! (period-1) points are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: Vec::new(),
        };
    }

    let closes: Vec<SeriesPoint> = bars
        .iter()
        .map(|bar| SeriesPoint::defined(bar.timestamp, bar.close))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: rolling_mean(&closes, period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn sma_is_trailing_window_mean() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_sma(&bars, 3);

        assert!((series.values[2].value - 20.0).abs() < 1e-12);
        assert!((series.values[3].value - 30.0).abs() < 1e-12);
        assert!((series.values[4].value - 40.0).abs() < 1e-12);
    }

    #[test]
    fn sma_period_1() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 1);

        for (bar, point) in bars.iter().zip(&series.values) {
            assert!(point.valid);
            assert!((point.value - bar.close).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn sma_aligned_with_bars() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_sma(&bars, 2);

        assert_eq!(series.values.len(), bars.len());
        for (bar, point) in bars.iter().zip(&series.values) {
            assert_eq!(bar.timestamp, point.timestamp);
        }
    }

    #[test]
    fn sma_empty_bars() {
        let series = calculate_sma(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn sma_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_sma(&bars, 0);
        assert!(series.values.is_empty());
    }

    #[test]
    fn sma_indicator_type() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.indicator_type, IndicatorType::Sma(5));
    }
}
