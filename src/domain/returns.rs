//! Return and equity series.
//!
//! Market returns are log returns of the close, undefined at the first bar.
//! The strategy return is the same-bar product of market return and position;
//! no one-bar lag is applied between signal and return attribution. Equity
//! curves are additive cumulative sums of returns plus 1, not compounded
//! products, and are fully defined: an undefined return contributes nothing.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;

pub fn market_returns(bars: &[OhlcvBar]) -> Vec<SeriesPoint> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                SeriesPoint::undefined(bar.timestamp)
            } else {
                SeriesPoint::defined(bar.timestamp, bar.close.ln() - bars[i - 1].close.ln())
            }
        })
        .collect()
}

pub fn strategy_returns(market: &[SeriesPoint], positions: &[i32]) -> Vec<SeriesPoint> {
    market
        .iter()
        .zip(positions)
        .map(|(point, &position)| {
            if point.valid {
                SeriesPoint::defined(point.timestamp, point.value * position as f64)
            } else {
                SeriesPoint::undefined(point.timestamp)
            }
        })
        .collect()
}

pub fn equity_curve(returns: &[SeriesPoint]) -> Vec<f64> {
    let mut cumulative = 0.0;
    returns
        .iter()
        .map(|point| {
            if point.valid {
                cumulative += point.value;
            }
            1.0 + cumulative
        })
        .collect()
}
