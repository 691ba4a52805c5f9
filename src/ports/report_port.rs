//! Report generation port trait.
//!
//! The output collaborator receives the full augmented bar-aligned series and
//! the ratio set; rendering (text, charts) happens entirely behind this port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::FxlabError;
use crate::domain::montecarlo::MonteCarloResult;
use std::path::Path;

pub trait ReportPort {
    fn write_backtest(&self, result: &BacktestResult, output_path: &Path)
        -> Result<(), FxlabError>;

    /// Default implementation: reports only the final winning backtest.
    fn write_search(&self, result: &MonteCarloResult, output_path: &Path)
        -> Result<(), FxlabError> {
        self.write_backtest(&result.best, output_path)
    }
}
