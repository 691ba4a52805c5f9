//! Configuration parsing and validation.
//!
//! Builds typed strategy and search configs from a raw [`ConfigPort`],
//! rejecting every invalid field before any computation starts. The engine
//! never runs with an unrecognized `ma_type`, inverted trading hours or a
//! degenerate period combination.

use crate::domain::error::FxlabError;
use crate::domain::montecarlo::{MonteCarloConfig, PeriodRange, Priority, SearchSpace};
use crate::domain::resample::Interval;
use crate::domain::strategy::{StrategyConfig, StrategyKind};
use crate::ports::config_port::ConfigPort;

const STRATEGY: &str = "strategy";
const MONTECARLO: &str = "montecarlo";

/// Parse and validate the `[strategy]` section.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, FxlabError> {
    let kind = build_strategy_kind(config)?;
    let interval: Interval = required_string(config, STRATEGY, "interval")?.parse()?;
    let start_hour = required_hour(config, "start_hour")?;
    let end_hour = required_hour(config, "end_hour")?;
    let plot = config.get_bool(STRATEGY, "plot", false);

    let strategy = StrategyConfig {
        interval,
        kind,
        start_hour,
        end_hour,
        plot,
    };
    strategy.validate()?;
    Ok(strategy)
}

/// Parse and validate the `[montecarlo]` section; the fixed fields shared
/// across samples (interval, ma_type, trading hours) come from `[strategy]`.
pub fn build_montecarlo_config(config: &dyn ConfigPort) -> Result<MonteCarloConfig, FxlabError> {
    let simulations = required_count(config, MONTECARLO, "simulations")?;
    let priority: Priority = required_string(config, MONTECARLO, "priority")?.parse()?;
    let seed = optional_seed(config)?;
    let interval: Interval = required_string(config, STRATEGY, "interval")?.parse()?;
    let start_hour = required_hour(config, "start_hour")?;
    let end_hour = required_hour(config, "end_hour")?;

    let space = match required_string(config, STRATEGY, "type")?
        .to_ascii_lowercase()
        .as_str()
    {
        "two_ma" => SearchSpace::TwoMa {
            ma_type: required_string(config, STRATEGY, "ma_type")?.parse()?,
            periods: period_range(config, "period_min", "period_max", PeriodRange::MA)?,
        },
        "three_ma" => {
            let periods = period_range(config, "period_min", "period_max", PeriodRange::MA)?;
            SearchSpace::ThreeMa {
                ma_type: required_string(config, STRATEGY, "ma_type")?.parse()?,
                periods,
                exit_periods: period_range(config, "exit_period_min", "exit_period_max", periods)?,
            }
        }
        "stochastic" => SearchSpace::Stochastic {
            periods: period_range(config, "period_min", "period_max", PeriodRange::STOCHASTIC)?,
        },
        other => {
            return Err(FxlabError::invalid_strategy(
                "type",
                format!("unsupported strategy type '{other}'"),
            ))
        }
    };

    let montecarlo = MonteCarloConfig {
        simulations,
        priority,
        space,
        interval,
        start_hour,
        end_hour,
        seed,
    };
    montecarlo.validate()?;
    Ok(montecarlo)
}

/// Validate without keeping the built config.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), FxlabError> {
    build_strategy_config(config).map(|_| ())
}

pub fn validate_montecarlo_config(config: &dyn ConfigPort) -> Result<(), FxlabError> {
    build_montecarlo_config(config).map(|_| ())
}

fn build_strategy_kind(config: &dyn ConfigPort) -> Result<StrategyKind, FxlabError> {
    match required_string(config, STRATEGY, "type")?
        .to_ascii_lowercase()
        .as_str()
    {
        "two_ma" => Ok(StrategyKind::TwoMa {
            ma_type: required_string(config, STRATEGY, "ma_type")?.parse()?,
            short_period: required_period(config, "s_period")?,
            long_period: required_period(config, "l_period")?,
        }),
        "three_ma" => Ok(StrategyKind::ThreeMa {
            ma_type: required_string(config, STRATEGY, "ma_type")?.parse()?,
            short_period: required_period(config, "s_period")?,
            long_period: required_period(config, "l_period")?,
            exit_period: required_period(config, "exit_period")?,
        }),
        "stochastic" => Ok(StrategyKind::Stochastic {
            k_period: required_period(config, "k_period")?,
            smooth: required_period(config, "smooth")?,
            d_period: required_period(config, "d_period")?,
        }),
        other => Err(FxlabError::invalid_strategy(
            "type",
            format!("unsupported strategy type '{other}'"),
        )),
    }
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, FxlabError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(FxlabError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn required_period(config: &dyn ConfigPort, key: &str) -> Result<usize, FxlabError> {
    let raw = required_string(config, STRATEGY, key)?;
    raw.trim()
        .parse::<usize>()
        .map_err(|_| FxlabError::invalid_strategy(key, format!("'{raw}' is not a valid period")))
}

fn required_hour(config: &dyn ConfigPort, key: &str) -> Result<u32, FxlabError> {
    let raw = required_string(config, STRATEGY, key)?;
    raw.trim()
        .parse::<u32>()
        .map_err(|_| FxlabError::invalid_strategy(key, format!("'{raw}' is not a valid hour")))
}

fn required_count(config: &dyn ConfigPort, section: &str, key: &str) -> Result<usize, FxlabError> {
    let raw = required_string(config, section, key)?;
    raw.trim().parse::<usize>().map_err(|_| {
        FxlabError::invalid_montecarlo(key, format!("'{raw}' is not a valid count"))
    })
}

fn optional_seed(config: &dyn ConfigPort) -> Result<Option<u64>, FxlabError> {
    match config.get_string(MONTECARLO, "seed") {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| FxlabError::invalid_montecarlo("seed", format!("'{raw}' is not a valid seed"))),
    }
}

fn period_range(
    config: &dyn ConfigPort,
    min_key: &str,
    max_key: &str,
    default: PeriodRange,
) -> Result<PeriodRange, FxlabError> {
    let min = optional_bound(config, min_key, default.min)?;
    let max = optional_bound(config, max_key, default.max)?;
    Ok(PeriodRange { min, max })
}

fn optional_bound(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, FxlabError> {
    match config.get_string(MONTECARLO, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            FxlabError::invalid_montecarlo(key, format!("'{raw}' is not a valid period bound"))
        }),
    }
}
