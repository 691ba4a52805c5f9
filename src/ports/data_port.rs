//! Data access port trait.
//!
//! The input collaborator hands the engine a timestamp-indexed bar sequence
//! with canonical OHLCV columns; the core itself never reads files.

use crate::domain::error::FxlabError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Fetch the full bar sequence for one instrument, sorted by timestamp.
    fn fetch_ohlcv(&self) -> Result<Vec<OhlcvBar>, FxlabError>;
}
