//! Signal generation for the strategy variants.
//!
//! Each variant turns indicator pairs plus the trading-hour window into four
//! boolean event series. A crossover is detected at the transition bar only:
//! strict inequality on both the previous and the current bar, never at index
//! 0, never across undefined indicator points. Entry signals are gated on the
//! trading window; exits fire at any hour.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stochastic::{calculate_stochastic_d, calculate_stochastic_k};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::SeriesPoint;
use crate::domain::strategy::{MaType, StrategyConfig, StrategyKind};

const OVERBOUGHT: f64 = 80.0;
const OVERSOLD: f64 = 20.0;

/// Four parallel event series, aligned 1:1 with the bar sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFlags {
    pub short_enter: Vec<bool>,
    pub short_exit: Vec<bool>,
    pub long_enter: Vec<bool>,
    pub long_exit: Vec<bool>,
}

impl SignalFlags {
    fn with_capacity(n: usize) -> Self {
        SignalFlags {
            short_enter: Vec::with_capacity(n),
            short_exit: Vec::with_capacity(n),
            long_enter: Vec::with_capacity(n),
            long_exit: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.short_enter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_enter.is_empty()
    }
}

/// Generate signal flags for the configured strategy variant.
///
/// Also returns the indicator series the signals were derived from, in
/// variant order, for the output collaborator. The config must already be
/// validated.
pub fn generate_signals(
    bars: &[OhlcvBar],
    config: &StrategyConfig,
) -> (SignalFlags, Vec<IndicatorSeries>) {
    match config.kind {
        StrategyKind::TwoMa {
            ma_type,
            short_period,
            long_period,
        } => {
            let ma_s = calculate_ma(bars, ma_type, short_period);
            let ma_l = calculate_ma(bars, ma_type, long_period);
            let flags = crossover_signals(bars, &ma_s, &ma_l, &ma_s, &ma_l, config);
            (flags, vec![ma_s, ma_l])
        }
        StrategyKind::ThreeMa {
            ma_type,
            short_period,
            long_period,
            exit_period,
        } => {
            let ma_s = calculate_ma(bars, ma_type, short_period);
            let ma_l = calculate_ma(bars, ma_type, long_period);
            let ma_exit = calculate_ma(bars, ma_type, exit_period);
            let flags = crossover_signals(bars, &ma_s, &ma_l, &ma_exit, &ma_s, config);
            (flags, vec![ma_s, ma_l, ma_exit])
        }
        StrategyKind::Stochastic {
            k_period,
            smooth,
            d_period,
        } => {
            let k = calculate_stochastic_k(bars, k_period, smooth);
            let d = calculate_stochastic_d(&k, d_period);
            let flags = stochastic_signals(bars, &k, &d, config);
            (flags, vec![k, d])
        }
    }
}

fn calculate_ma(bars: &[OhlcvBar], ma_type: MaType, period: usize) -> IndicatorSeries {
    match ma_type {
        MaType::Sma => calculate_sma(bars, period),
        MaType::Ema => calculate_ema(bars, period),
    }
}

/// MA-style signals: entries from fast/slow crossovers, exits from the exit
/// pair. For the two-MA variant the exit pair is the entry pair itself; the
/// three-MA variant exits on the dedicated exit MA crossing the short MA.
fn crossover_signals(
    bars: &[OhlcvBar],
    fast: &IndicatorSeries,
    slow: &IndicatorSeries,
    exit_fast: &IndicatorSeries,
    exit_slow: &IndicatorSeries,
    config: &StrategyConfig,
) -> SignalFlags {
    let mut flags = SignalFlags::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let in_window = bar.within_hours(config.start_hour, config.end_hour);

        flags
            .short_enter
            .push(crossed_below(&fast.values, &slow.values, i) && in_window);
        flags
            .short_exit
            .push(crossed_above(&exit_fast.values, &exit_slow.values, i));
        flags
            .long_enter
            .push(crossed_above(&fast.values, &slow.values, i) && in_window);
        flags
            .long_exit
            .push(crossed_below(&exit_fast.values, &exit_slow.values, i));
    }

    flags
}

/// Stochastic signals: %K/%D crossovers with overbought/oversold thresholds
/// on entries only.
fn stochastic_signals(
    bars: &[OhlcvBar],
    k: &IndicatorSeries,
    d: &IndicatorSeries,
    config: &StrategyConfig,
) -> SignalFlags {
    let mut flags = SignalFlags::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let in_window = bar.within_hours(config.start_hour, config.end_hour);
        let crossed_down = crossed_below(&k.values, &d.values, i);
        let crossed_up = crossed_above(&k.values, &d.values, i);

        flags
            .short_enter
            .push(crossed_down && k.values[i].value > OVERBOUGHT && in_window);
        flags.short_exit.push(crossed_up);
        flags
            .long_enter
            .push(crossed_up && k.values[i].value < OVERSOLD && in_window);
        flags.long_exit.push(crossed_down);
    }

    flags
}

fn crossed_above(a: &[SeriesPoint], b: &[SeriesPoint], i: usize) -> bool {
    if i == 0 {
        return false;
    }
    let (curr_a, curr_b, prev_a, prev_b) = (a[i], b[i], a[i - 1], b[i - 1]);
    curr_a.valid
        && curr_b.valid
        && prev_a.valid
        && prev_b.valid
        && curr_a.value > curr_b.value
        && prev_a.value < prev_b.value
}

fn crossed_below(a: &[SeriesPoint], b: &[SeriesPoint], i: usize) -> bool {
    if i == 0 {
        return false;
    }
    let (curr_a, curr_b, prev_a, prev_b) = (a[i], b[i], a[i - 1], b[i - 1]);
    curr_a.valid
        && curr_b.valid
        && prev_a.valid
        && prev_b.valid
        && curr_a.value < curr_b.value
        && prev_a.value > prev_b.value
}
