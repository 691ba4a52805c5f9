//! Shared rolling-window kernels for indicator calculations.
//!
//! A rolling value is defined only when every point in its trailing window is
//! defined; warm-up points and windows containing an undefined input stay
//! undefined.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;

/// Trailing mean of width `period` over a point series.
pub fn rolling_mean(points: &[SeriesPoint], period: usize) -> Vec<SeriesPoint> {
    if period == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        if i + 1 < period {
            out.push(SeriesPoint::undefined(point.timestamp));
            continue;
        }
        let window = &points[i + 1 - period..=i];
        if window.iter().all(|p| p.valid) {
            let sum: f64 = window.iter().map(|p| p.value).sum();
            out.push(SeriesPoint::defined(point.timestamp, sum / period as f64));
        } else {
            out.push(SeriesPoint::undefined(point.timestamp));
        }
    }
    out
}

/// Trailing minimum of the bar lows over `period` bars.
pub fn rolling_low(bars: &[OhlcvBar], period: usize) -> Vec<SeriesPoint> {
    rolling_extremum(bars, period, |bar| bar.low, f64::min)
}

/// Trailing maximum of the bar highs over `period` bars.
pub fn rolling_high(bars: &[OhlcvBar], period: usize) -> Vec<SeriesPoint> {
    rolling_extremum(bars, period, |bar| bar.high, f64::max)
}

fn rolling_extremum(
    bars: &[OhlcvBar],
    period: usize,
    field: fn(&OhlcvBar) -> f64,
    pick: fn(f64, f64) -> f64,
) -> Vec<SeriesPoint> {
    if period == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < period {
            out.push(SeriesPoint::undefined(bar.timestamp));
            continue;
        }
        let extremum = bars[i + 1 - period..=i]
            .iter()
            .map(field)
            .reduce(pick)
            .expect("window is non-empty");
        out.push(SeriesPoint::defined(bar.timestamp, extremum));
    }
    out
}
