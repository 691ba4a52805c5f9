//! Stochastic oscillator (%K and %D).
//!
//! Raw %K = 100 * (close - min(low, k_period)) / (max(high, k_period) -
//! min(low, k_period)), then smoothed by a trailing mean of width `smooth`.
//! %D is a trailing mean of the smoothed %K. A flat window (zero high-low
//! range) yields an undefined point, propagated downstream rather than raised.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_high, rolling_low, rolling_mean};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;

pub fn calculate_stochastic_k(bars: &[OhlcvBar], k_period: usize, smooth: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::StochasticK { k_period, smooth };
    if k_period == 0 || smooth == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let lows = rolling_low(bars, k_period);
    let highs = rolling_high(bars, k_period);

    let mut raw = Vec::with_capacity(bars.len());
    for ((bar, low), high) in bars.iter().zip(&lows).zip(&highs) {
        if !low.valid || !high.valid {
            raw.push(SeriesPoint::undefined(bar.timestamp));
            continue;
        }
        let range = high.value - low.value;
        if range == 0.0 {
            raw.push(SeriesPoint::undefined(bar.timestamp));
        } else {
            let k = 100.0 * (bar.close - low.value) / range;
            raw.push(SeriesPoint::defined(bar.timestamp, k));
        }
    }

    IndicatorSeries {
        indicator_type,
        values: rolling_mean(&raw, smooth),
    }
}

pub fn calculate_stochastic_d(k: &IndicatorSeries, d_period: usize) -> IndicatorSeries {
    let (k_period, smooth) = match k.indicator_type {
        IndicatorType::StochasticK { k_period, smooth } => (k_period, smooth),
        _ => (0, 0),
    };
    let indicator_type = IndicatorType::StochasticD {
        k_period,
        smooth,
        d_period,
    };
    if d_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    IndicatorSeries {
        indicator_type,
        values: rolling_mean(&k.values, d_period),
    }
}
