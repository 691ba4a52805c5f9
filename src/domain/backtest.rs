//! End-to-end backtest pipeline.
//!
//! Pure function of (price series, config): resample, derive indicators and
//! signals, resolve positions, accumulate returns and equity, score. The
//! caller's bars are never mutated; every derived series in the result is
//! aligned 1:1 with the resampled bars.

use crate::domain::error::FxlabError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::RatioSet;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::resolve_positions;
use crate::domain::resample::resample;
use crate::domain::returns::{equity_curve, market_returns, strategy_returns};
use crate::domain::series::SeriesPoint;
use crate::domain::signal::{generate_signals, SignalFlags};
use crate::domain::strategy::StrategyConfig;

/// A market return needs two bars.
pub const MIN_BARS: usize = 2;

/// Everything one strategy run produces: the augmented bar-aligned series for
/// the report collaborator plus the ratio set.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub config: StrategyConfig,
    pub bars: Vec<OhlcvBar>,
    pub indicators: Vec<IndicatorSeries>,
    pub signals: SignalFlags,
    pub positions: Vec<i32>,
    pub market_returns: Vec<SeriesPoint>,
    pub strategy_returns: Vec<SeriesPoint>,
    pub market_equity: Vec<f64>,
    pub strategy_equity: Vec<f64>,
    pub ratios: RatioSet,
}

pub fn run_backtest(
    bars: &[OhlcvBar],
    config: &StrategyConfig,
) -> Result<BacktestResult, FxlabError> {
    config.validate()?;

    let resampled = resample(bars, config.interval);
    if resampled.len() < MIN_BARS {
        return Err(FxlabError::InsufficientData {
            bars: resampled.len(),
            minimum: MIN_BARS,
        });
    }

    let (signals, indicators) = generate_signals(&resampled, config);
    let positions = resolve_positions(&signals);
    let market = market_returns(&resampled);
    let strategy = strategy_returns(&market, &positions);
    let market_equity = equity_curve(&market);
    let strategy_equity = equity_curve(&strategy);
    let ratios = RatioSet::compute(&market_equity, &strategy_equity)?;

    Ok(BacktestResult {
        config: config.clone(),
        bars: resampled,
        indicators,
        signals,
        positions,
        market_returns: market,
        strategy_returns: strategy,
        market_equity,
        strategy_equity,
        ratios,
    })
}
