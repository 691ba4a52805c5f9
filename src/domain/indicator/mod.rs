//! Technical indicator types.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a bar-aligned series of indicator values

pub mod ema;
pub mod sma;
pub mod stochastic;

use crate::domain::series::SeriesPoint;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    StochasticK {
        k_period: usize,
        smooth: usize,
    },
    StochasticD {
        k_period: usize,
        smooth: usize,
        d_period: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<SeriesPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::StochasticK { k_period, smooth } => {
                write!(f, "STOCH_K({},{})", k_period, smooth)
            }
            IndicatorType::StochasticD {
                k_period,
                smooth,
                d_period,
            } => write!(f, "STOCH_D({},{},{})", k_period, smooth, d_period),
        }
    }
}
