//! Strategy configuration.
//!
//! The three strategy variants are a closed set of tagged variants dispatched
//! by the signal generator; the rest of the pipeline is shared and
//! non-polymorphic.

use crate::domain::error::FxlabError;
use crate::domain::resample::Interval;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl FromStr for MaType {
    type Err = FxlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SMA" => Ok(MaType::Sma),
            "EMA" => Ok(MaType::Ema),
            other => Err(FxlabError::invalid_strategy(
                "ma_type",
                format!("unsupported moving average type '{other}', expected SMA or EMA"),
            )),
        }
    }
}

impl fmt::Display for MaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaType::Sma => write!(f, "SMA"),
            MaType::Ema => write!(f, "EMA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyKind {
    TwoMa {
        ma_type: MaType,
        short_period: usize,
        long_period: usize,
    },
    ThreeMa {
        ma_type: MaType,
        short_period: usize,
        long_period: usize,
        exit_period: usize,
    },
    Stochastic {
        k_period: usize,
        smooth: usize,
        d_period: usize,
    },
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::TwoMa { .. } => "two_ma",
            StrategyKind::ThreeMa { .. } => "three_ma",
            StrategyKind::Stochastic { .. } => "stochastic",
        }
    }

    fn validate(&self) -> Result<(), FxlabError> {
        match *self {
            StrategyKind::TwoMa {
                short_period,
                long_period,
                ..
            } => validate_ma_periods(short_period, long_period),
            StrategyKind::ThreeMa {
                short_period,
                long_period,
                exit_period,
                ..
            } => {
                validate_ma_periods(short_period, long_period)?;
                validate_positive("exit_period", exit_period)
            }
            StrategyKind::Stochastic {
                k_period,
                smooth,
                d_period,
            } => {
                validate_positive("k_period", k_period)?;
                validate_positive("smooth", smooth)?;
                validate_positive("d_period", d_period)
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::TwoMa {
                ma_type,
                short_period,
                long_period,
            } => write!(f, "2MA({ma_type},{short_period},{long_period})"),
            StrategyKind::ThreeMa {
                ma_type,
                short_period,
                long_period,
                exit_period,
            } => write!(f, "3MA({ma_type},{short_period},{long_period},{exit_period})"),
            StrategyKind::Stochastic {
                k_period,
                smooth,
                d_period,
            } => write!(f, "STOCH({k_period},{smooth},{d_period})"),
        }
    }
}

fn validate_positive(key: &str, period: usize) -> Result<(), FxlabError> {
    if period == 0 {
        return Err(FxlabError::invalid_strategy(
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(())
}

fn validate_ma_periods(short_period: usize, long_period: usize) -> Result<(), FxlabError> {
    validate_positive("s_period", short_period)?;
    validate_positive("l_period", long_period)?;
    if short_period >= long_period {
        return Err(FxlabError::invalid_strategy(
            "s_period",
            format!("short period {short_period} must be less than long period {long_period}"),
        ));
    }
    Ok(())
}

/// Full configuration for one strategy run. Immutable for the duration of the
/// run; the engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub interval: Interval,
    pub kind: StrategyKind,
    /// Trading window, inclusive hour-of-day bounds. Gates entry signals only.
    pub start_hour: u32,
    pub end_hour: u32,
    /// Consumed by the external report/plot collaborator; the engine ignores it.
    pub plot: bool,
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), FxlabError> {
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(FxlabError::invalid_strategy(
                "start_hour",
                "trading hours must be within 0-23",
            ));
        }
        if self.start_hour > self.end_hour {
            return Err(FxlabError::invalid_strategy(
                "start_hour",
                format!(
                    "start_hour {} must not exceed end_hour {}",
                    self.start_hour, self.end_hour
                ),
            ));
        }
        self.kind.validate()
    }
}
