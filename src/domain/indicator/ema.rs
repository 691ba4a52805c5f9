//! Exponential Moving Average indicator.
//!
//! Span-style EMA: k = 2/(n+1), EMA[0] = C[0], then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Uses all history from the start, so
//! every point is defined; there is no warm-up window.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(bars.len());
    let mut ema = bars[0].close;
    values.push(SeriesPoint::defined(bars[0].timestamp, ema));

    for bar in &bars[1..] {
        ema = bar.close * k + ema * (1.0 - k);
        values.push(SeriesPoint::defined(bar.timestamp, ema));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
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
    fn ema_defined_from_first_bar() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values.iter().all(|p| p.valid));
        assert!((series.values[0].value - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_identity() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let mut expected = 10.0;
        for (i, bar) in bars.iter().enumerate().skip(1) {
            expected = bar.close * k + expected * (1.0 - k);
            assert!((series.values[i].value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_period_1_tracks_price() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 1);

        for (bar, point) in bars.iter().zip(&series.values) {
            assert!((point.value - bar.close).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let series = calculate_ema(&bars, 3);

        for point in &series.values {
            assert!((point.value - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_smoothing_factor() {
        let period = 10;
        let k = 2.0 / (period as f64 + 1.0);
        assert!((k - 2.0 / 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_ema(&bars, 0);
        assert!(series.values.is_empty());
    }
}
