//! Monte Carlo parameter search.
//!
//! Draws indicator periods uniformly at random from integer ranges, scores
//! every sample with the full backtest pipeline, and selects the best run by
//! the configured objective. Sampling is sequential and seeded so a search is
//! reproducible; the backtests themselves are independent pure functions and
//! run in parallel, joined before selection. A failed simulation is skipped
//! and recorded instead of aborting the whole search.

use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::error::FxlabError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::resample::Interval;
use crate::domain::strategy::{MaType, StrategyConfig, StrategyKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Selection objective for the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Maximize strategy return.
    Return,
    /// Minimize max drawdown.
    Drawdown,
}

impl FromStr for Priority {
    type Err = FxlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "return" => Ok(Priority::Return),
            "drawdown" => Ok(Priority::Drawdown),
            other => Err(FxlabError::invalid_montecarlo(
                "priority",
                format!("unsupported priority '{other}', expected return or drawdown"),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Return => write!(f, "return"),
            Priority::Drawdown => write!(f, "drawdown"),
        }
    }
}

/// Inclusive integer sampling range for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    pub min: usize,
    pub max: usize,
}

impl PeriodRange {
    /// Default range for moving average periods.
    pub const MA: PeriodRange = PeriodRange { min: 8, max: 80 };
    /// Default range for the stochastic oscillator parameters.
    pub const STOCHASTIC: PeriodRange = PeriodRange { min: 3, max: 20 };

    fn sample(&self, rng: &mut StdRng) -> usize {
        rng.gen_range(self.min..=self.max)
    }

    fn validate(&self, key: &str) -> Result<(), FxlabError> {
        if self.min == 0 {
            return Err(FxlabError::invalid_montecarlo(
                key,
                "range minimum must be positive",
            ));
        }
        if self.min > self.max {
            return Err(FxlabError::invalid_montecarlo(
                key,
                format!("range minimum {} exceeds maximum {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Which strategy family is searched, and from which ranges its periods are
/// drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSpace {
    TwoMa {
        ma_type: MaType,
        periods: PeriodRange,
    },
    ThreeMa {
        ma_type: MaType,
        periods: PeriodRange,
        exit_periods: PeriodRange,
    },
    Stochastic {
        periods: PeriodRange,
    },
}

impl SearchSpace {
    /// Draw one parameter set.
    ///
    /// The two MA periods are drawn from the same range and ordered; when
    /// they collide the long period is bumped by one without a bound
    /// re-check, which may push it past the declared maximum. The overrun is
    /// reported alongside the sample rather than silently accepted.
    fn sample(&self, rng: &mut StdRng) -> (StrategyKind, bool) {
        match *self {
            SearchSpace::TwoMa { ma_type, periods } => {
                let (short_period, long_period, overrun) = sample_ma_pair(periods, rng);
                (
                    StrategyKind::TwoMa {
                        ma_type,
                        short_period,
                        long_period,
                    },
                    overrun,
                )
            }
            SearchSpace::ThreeMa {
                ma_type,
                periods,
                exit_periods,
            } => {
                let (short_period, long_period, overrun) = sample_ma_pair(periods, rng);
                let exit_period = exit_periods.sample(rng);
                (
                    StrategyKind::ThreeMa {
                        ma_type,
                        short_period,
                        long_period,
                        exit_period,
                    },
                    overrun,
                )
            }
            SearchSpace::Stochastic { periods } => {
                let k_period = periods.sample(rng);
                let smooth = periods.sample(rng);
                let d_period = periods.sample(rng);
                (
                    StrategyKind::Stochastic {
                        k_period,
                        smooth,
                        d_period,
                    },
                    false,
                )
            }
        }
    }

    fn validate(&self) -> Result<(), FxlabError> {
        match self {
            SearchSpace::TwoMa { periods, .. } => periods.validate("periods"),
            SearchSpace::ThreeMa {
                periods,
                exit_periods,
                ..
            } => {
                periods.validate("periods")?;
                exit_periods.validate("exit_periods")
            }
            SearchSpace::Stochastic { periods } => periods.validate("periods"),
        }
    }
}

fn sample_ma_pair(periods: PeriodRange, rng: &mut StdRng) -> (usize, usize, bool) {
    let a = periods.sample(rng);
    let b = periods.sample(rng);
    let (short, mut long) = if a <= b { (a, b) } else { (b, a) };
    let mut overrun = false;
    if short == long {
        long += 1;
        overrun = long > periods.max;
    }
    (short, long, overrun)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloConfig {
    pub simulations: usize,
    pub priority: Priority,
    pub space: SearchSpace,
    pub interval: Interval,
    pub start_hour: u32,
    pub end_hour: u32,
    /// Fixed seed for reproducible sampling; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), FxlabError> {
        if self.simulations == 0 {
            return Err(FxlabError::invalid_montecarlo(
                "simulations",
                "at least one simulation is required",
            ));
        }
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(FxlabError::invalid_montecarlo(
                "start_hour",
                "trading hours must be within 0-23",
            ));
        }
        if self.start_hour > self.end_hour {
            return Err(FxlabError::invalid_montecarlo(
                "start_hour",
                format!(
                    "start_hour {} must not exceed end_hour {}",
                    self.start_hour, self.end_hour
                ),
            ));
        }
        self.space.validate()
    }

    fn strategy_config(&self, kind: StrategyKind, plot: bool) -> StrategyConfig {
        StrategyConfig {
            interval: self.interval,
            kind,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            plot,
        }
    }
}

/// One scored simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloRun {
    /// Simulation number in sampling order.
    pub index: usize,
    pub params: StrategyKind,
    pub strategy_return: f64,
    pub max_drawdown: f64,
    /// The equal-period correction pushed the long period past its range.
    pub sampling_overrun: bool,
}

/// A simulation whose pipeline failed; recorded, not fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSimulation {
    pub index: usize,
    pub params: StrategyKind,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct MonteCarloResult {
    pub runs: Vec<MonteCarloRun>,
    pub skipped: Vec<SkippedSimulation>,
    /// Index into `runs` of the winning simulation.
    pub best_index: usize,
    /// Final full backtest of the winning parameters, plot flag enabled.
    pub best: BacktestResult,
}

pub fn run_search(
    bars: &[OhlcvBar],
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, FxlabError> {
    config.validate()?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let samples: Vec<(StrategyKind, bool)> = (0..config.simulations)
        .map(|_| config.space.sample(&mut rng))
        .collect();

    // Each simulation is a pure function of (bars, config); score them in
    // parallel and join before selection.
    let outcomes: Vec<Result<BacktestResult, FxlabError>> = samples
        .par_iter()
        .map(|(kind, _)| run_backtest(bars, &config.strategy_config(kind.clone(), false)))
        .collect();

    let mut runs = Vec::new();
    let mut skipped = Vec::new();
    for (index, ((kind, overrun), outcome)) in samples.into_iter().zip(outcomes).enumerate() {
        match outcome {
            Ok(result) => runs.push(MonteCarloRun {
                index,
                params: kind,
                strategy_return: result.ratios.strategy_return,
                max_drawdown: result.ratios.max_drawdown,
                sampling_overrun: overrun,
            }),
            Err(err) => skipped.push(SkippedSimulation {
                index,
                params: kind,
                reason: err.to_string(),
            }),
        }
    }

    let best_index =
        select_best(&runs, config.priority).ok_or_else(|| FxlabError::SearchExhausted {
            attempted: config.simulations,
            first_failure: skipped
                .first()
                .map(|s| s.reason.clone())
                .unwrap_or_else(|| "no simulation produced finite ratios".to_string()),
        })?;

    let winner = runs[best_index].params.clone();
    let best = run_backtest(bars, &config.strategy_config(winner, true))?;

    Ok(MonteCarloResult {
        runs,
        skipped,
        best_index,
        best,
    })
}

/// First-occurrence argmax/argmin over the finite-valued runs.
fn select_best(runs: &[MonteCarloRun], priority: Priority) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, run) in runs.iter().enumerate() {
        let key = match priority {
            Priority::Return => run.strategy_return,
            Priority::Drawdown => run.max_drawdown,
        };
        if !key.is_finite() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, best_key)) => match priority {
                Priority::Return => key > best_key,
                Priority::Drawdown => key < best_key,
            },
        };
        if better {
            best = Some((i, key));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn oscillating_bars(n: usize) -> Vec<OhlcvBar> {
        (0..n)
            .map(|i| {
                let close = 1.0 + 0.1 * ((i as f64) * 0.9).sin();
                OhlcvBar {
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap()
                        + chrono::Duration::hours(i as i64),
                    open: close,
                    high: close + 0.02,
                    low: close - 0.02,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    fn two_ma_search(simulations: usize, periods: PeriodRange) -> MonteCarloConfig {
        MonteCarloConfig {
            simulations,
            priority: Priority::Return,
            space: SearchSpace::TwoMa {
                ma_type: MaType::Sma,
                periods,
            },
            interval: Interval::new(1, crate::domain::resample::IntervalUnit::Hour),
            start_hour: 0,
            end_hour: 23,
            seed: Some(42),
        }
    }

    fn make_run(index: usize, strategy_return: f64, max_drawdown: f64) -> MonteCarloRun {
        MonteCarloRun {
            index,
            params: StrategyKind::TwoMa {
                ma_type: MaType::Sma,
                short_period: 8,
                long_period: 21,
            },
            strategy_return,
            max_drawdown,
            sampling_overrun: false,
        }
    }

    #[test]
    fn priority_parsing() {
        assert_eq!("return".parse::<Priority>().unwrap(), Priority::Return);
        assert_eq!("DRAWDOWN".parse::<Priority>().unwrap(), Priority::Drawdown);
        assert!("sharpe".parse::<Priority>().is_err());
    }

    #[test]
    fn select_best_by_return_takes_maximum() {
        let runs = vec![
            make_run(0, 0.1, 5.0),
            make_run(1, 0.4, 9.0),
            make_run(2, 0.2, 1.0),
        ];
        assert_eq!(select_best(&runs, Priority::Return), Some(1));
    }

    #[test]
    fn select_best_by_drawdown_takes_minimum() {
        let runs = vec![
            make_run(0, 0.1, 5.0),
            make_run(1, 0.4, 9.0),
            make_run(2, 0.2, 1.0),
        ];
        assert_eq!(select_best(&runs, Priority::Drawdown), Some(2));
    }

    #[test]
    fn select_best_ties_take_first_occurrence() {
        let runs = vec![make_run(0, 0.2, 5.0), make_run(1, 0.2, 5.0)];
        assert_eq!(select_best(&runs, Priority::Return), Some(0));
    }

    #[test]
    fn select_best_skips_non_finite() {
        let runs = vec![make_run(0, f64::NAN, 5.0), make_run(1, 0.1, 5.0)];
        assert_eq!(select_best(&runs, Priority::Return), Some(1));

        let all_nan = vec![make_run(0, f64::NAN, 5.0)];
        assert_eq!(select_best(&all_nan, Priority::Return), None);
    }

    #[test]
    fn equal_period_bump_and_overrun() {
        let mut rng = StdRng::seed_from_u64(7);
        // Degenerate range: both draws always collide, the bump always
        // exceeds the maximum.
        let (short, long, overrun) = sample_ma_pair(PeriodRange { min: 4, max: 4 }, &mut rng);
        assert_eq!(short, 4);
        assert_eq!(long, 5);
        assert!(overrun);
    }

    #[test]
    fn sampled_pairs_are_ordered_and_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = PeriodRange { min: 8, max: 80 };
        for _ in 0..200 {
            let (short, long, overrun) = sample_ma_pair(range, &mut rng);
            assert!(short >= range.min && short <= range.max);
            assert!(short < long);
            if overrun {
                assert_eq!(long, range.max + 1);
            } else {
                assert!(long <= range.max);
            }
        }
    }

    #[test]
    fn single_simulation_reduces_to_one_backtest() {
        let bars = oscillating_bars(60);
        // min == max forces the sampled pair to (2, 3) deterministically.
        let config = two_ma_search(1, PeriodRange { min: 2, max: 2 });
        let result = run_search(&bars, &config).unwrap();

        assert_eq!(result.runs.len(), 1);
        assert_eq!(result.best_index, 0);
        assert!(result.runs[0].sampling_overrun);

        let direct = run_backtest(
            &bars,
            &config.strategy_config(
                StrategyKind::TwoMa {
                    ma_type: MaType::Sma,
                    short_period: 2,
                    long_period: 3,
                },
                false,
            ),
        )
        .unwrap();
        assert_eq!(result.runs[0].strategy_return, direct.ratios.strategy_return);
        assert_eq!(result.runs[0].max_drawdown, direct.ratios.max_drawdown);
        assert_eq!(result.best.ratios, direct.ratios);
    }

    #[test]
    fn search_is_reproducible_with_fixed_seed() {
        let bars = oscillating_bars(80);
        let config = two_ma_search(12, PeriodRange { min: 2, max: 9 });

        let a = run_search(&bars, &config).unwrap();
        let b = run_search(&bars, &config).unwrap();

        assert_eq!(a.runs.len(), b.runs.len());
        for (ra, rb) in a.runs.iter().zip(&b.runs) {
            assert_eq!(ra, rb);
        }
        assert_eq!(a.best_index, b.best_index);
    }

    #[test]
    fn winner_beats_every_other_run() {
        let bars = oscillating_bars(80);
        let config = two_ma_search(16, PeriodRange { min: 2, max: 9 });
        let result = run_search(&bars, &config).unwrap();

        let winner = &result.runs[result.best_index];
        for run in &result.runs {
            assert!(winner.strategy_return >= run.strategy_return);
        }
    }

    #[test]
    fn drawdown_priority_minimizes() {
        let bars = oscillating_bars(80);
        let mut config = two_ma_search(16, PeriodRange { min: 2, max: 9 });
        config.priority = Priority::Drawdown;
        let result = run_search(&bars, &config).unwrap();

        let winner = &result.runs[result.best_index];
        for run in &result.runs {
            assert!(winner.max_drawdown <= run.max_drawdown);
        }
    }

    #[test]
    fn every_simulation_is_accounted_for() {
        let bars = oscillating_bars(60);
        let config = two_ma_search(10, PeriodRange { min: 2, max: 9 });
        let result = run_search(&bars, &config).unwrap();

        assert_eq!(result.runs.len() + result.skipped.len(), config.simulations);
    }

    #[test]
    fn flat_market_exhausts_the_search() {
        let mut bars = oscillating_bars(40);
        for bar in &mut bars {
            bar.open = 1.0;
            bar.high = 1.0;
            bar.low = 1.0;
            bar.close = 1.0;
        }
        let config = two_ma_search(4, PeriodRange { min: 2, max: 9 });
        let err = run_search(&bars, &config).unwrap_err();
        assert!(matches!(err, FxlabError::SearchExhausted { attempted: 4, .. }));
    }

    #[test]
    fn final_run_enables_plot_flag() {
        let bars = oscillating_bars(60);
        let config = two_ma_search(4, PeriodRange { min: 2, max: 9 });
        let result = run_search(&bars, &config).unwrap();

        assert!(result.best.config.plot);
        assert_eq!(result.best.config.kind, result.runs[result.best_index].params);
    }

    #[test]
    fn zero_simulations_rejected() {
        let bars = oscillating_bars(60);
        let config = two_ma_search(0, PeriodRange { min: 2, max: 9 });
        assert!(matches!(
            run_search(&bars, &config).unwrap_err(),
            FxlabError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn stochastic_space_samples_all_three_parameters() {
        let mut rng = StdRng::seed_from_u64(11);
        let space = SearchSpace::Stochastic {
            periods: PeriodRange::STOCHASTIC,
        };
        for _ in 0..50 {
            let (kind, overrun) = space.sample(&mut rng);
            assert!(!overrun);
            match kind {
                StrategyKind::Stochastic {
                    k_period,
                    smooth,
                    d_period,
                } => {
                    for p in [k_period, smooth, d_period] {
                        assert!((3..=20).contains(&p));
                    }
                }
                other => panic!("unexpected kind {other:?}"),
            }
        }
    }

    #[test]
    fn default_ranges() {
        assert_eq!(PeriodRange::MA, PeriodRange { min: 8, max: 80 });
        assert_eq!(PeriodRange::STOCHASTIC, PeriodRange { min: 3, max: 20 });
    }
}
