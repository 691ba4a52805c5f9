//! Performance ratios for a completed equity curve.

use crate::domain::error::FxlabError;

/// Aggregate performance ratios for one strategy run. Immutable once computed.
///
/// `drawdown_start` and `drawdown_end` are positional indices into the equity
/// curve; `drawdown_period` is their distance in bars. `max_drawdown` is a
/// positive percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSet {
    pub market_return: f64,
    pub strategy_return: f64,
    pub max_drawdown: f64,
    pub drawdown_period: usize,
    pub drawdown_start: usize,
    pub drawdown_end: usize,
    pub risk_adjusted_return: f64,
}

impl RatioSet {
    /// Compute the ratio set from fully populated equity curves.
    ///
    /// Fails with [`FxlabError::ZeroDrawdown`] when the strategy equity never
    /// declines (flat or monotonically rising curve): the risk-adjusted
    /// return is indeterminate there and the caller must handle it rather
    /// than receive a silent infinity.
    pub fn compute(market_equity: &[f64], strategy_equity: &[f64]) -> Result<Self, FxlabError> {
        if market_equity.is_empty() || strategy_equity.is_empty() {
            return Err(FxlabError::InsufficientData {
                bars: 0,
                minimum: 1,
            });
        }

        let market_return = market_equity[market_equity.len() - 1] - 1.0;
        let strategy_return = strategy_equity[strategy_equity.len() - 1] - 1.0;

        let (drawdown_start, drawdown_end) = drawdown_indices(strategy_equity);
        let max_drawdown = (strategy_equity[drawdown_start] - strategy_equity[drawdown_end]) * 100.0;

        if max_drawdown == 0.0 {
            return Err(FxlabError::ZeroDrawdown);
        }

        let risk_adjusted_return = strategy_return * 100.0 / max_drawdown;

        Ok(RatioSet {
            market_return,
            strategy_return,
            max_drawdown,
            drawdown_period: drawdown_end - drawdown_start,
            drawdown_start,
            drawdown_end,
            risk_adjusted_return,
        })
    }
}

/// Deepest trough relative to the running peak, then the highest peak at or
/// before that trough. Ties resolve to the first occurrence.
fn drawdown_indices(equity: &[f64]) -> (usize, usize) {
    let mut running_max = equity[0];
    let mut deepest = f64::NEG_INFINITY;
    let mut drawdown_end = 0;
    for (i, &e) in equity.iter().enumerate() {
        if e > running_max {
            running_max = e;
        }
        let depth = running_max - e;
        if depth > deepest {
            deepest = depth;
            drawdown_end = i;
        }
    }

    let mut peak = f64::NEG_INFINITY;
    let mut drawdown_start = 0;
    for (i, &e) in equity[..=drawdown_end].iter().enumerate() {
        if e > peak {
            peak = e;
            drawdown_start = i;
        }
    }

    (drawdown_start, drawdown_end)
}
