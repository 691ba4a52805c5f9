//! Plain-text report adapter.
//!
//! Renders the ratio summary as text. When the run's plot flag is set it also
//! exports the augmented bar-aligned series (indicators, position, returns,
//! equity curves) as CSV next to the report, as input for the external
//! charting tool.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::FxlabError;
use crate::domain::metrics::RatioSet;
use crate::domain::montecarlo::MonteCarloResult;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn write_backtest(
        &self,
        result: &BacktestResult,
        output_path: &Path,
    ) -> Result<(), FxlabError> {
        fs::write(output_path, render_backtest(result))?;
        if result.config.plot {
            write_series_csv(result, &series_path(output_path))?;
        }
        Ok(())
    }

    fn write_search(
        &self,
        result: &MonteCarloResult,
        output_path: &Path,
    ) -> Result<(), FxlabError> {
        let mut report = String::new();
        let scored = result.runs.len();
        let skipped = result.skipped.len();
        let overruns = result
            .runs
            .iter()
            .filter(|run| run.sampling_overrun)
            .count();
        let best = &result.runs[result.best_index];

        report.push_str("MONTE CARLO SEARCH\n\n");
        report.push_str(&format!(
            "Simulations: {} ({} scored, {} skipped)\n",
            scored + skipped,
            scored,
            skipped
        ));
        report.push_str(&format!("Sampling overruns: {}\n", overruns));
        report.push_str(&format!(
            "Best parameters: {} (simulation #{})\n\n",
            best.params, best.index
        ));
        report.push_str(&render_backtest(&result.best));

        fs::write(output_path, report)?;
        if result.best.config.plot {
            write_series_csv(&result.best, &series_path(output_path))?;
        }
        Ok(())
    }
}

fn render_backtest(result: &BacktestResult) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "Strategy: {} @ {}\n",
        result.config.kind, result.config.interval
    ));
    report.push_str(&format!(
        "Trading hours: {:02}-{:02}\n",
        result.config.start_hour, result.config.end_hour
    ));
    report.push_str(&format!("Bars: {}\n\n", result.bars.len()));
    report.push_str(&render_ratios(&result.ratios));
    report
}

fn render_ratios(ratios: &RatioSet) -> String {
    format!(
        "RATIOS:\n\n\
         Market return: {:.2}%\n\
         Strategy return: {:.2}%\n\
         Max drawdown: {:.2}%\n\
         Drawdown period: {} bars (index {} -> {})\n\
         RAR: {:.2}\n",
        ratios.market_return * 100.0,
        ratios.strategy_return * 100.0,
        ratios.max_drawdown,
        ratios.drawdown_period,
        ratios.drawdown_start,
        ratios.drawdown_end,
        ratios.risk_adjusted_return,
    )
}

fn series_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    output_path.with_file_name(format!("{stem}_series.csv"))
}

fn write_series_csv(result: &BacktestResult, path: &Path) -> Result<(), FxlabError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| FxlabError::Data {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;

    let mut header = vec![
        "Date".to_string(),
        "Open".to_string(),
        "High".to_string(),
        "Low".to_string(),
        "Close".to_string(),
        "Volume".to_string(),
    ];
    for series in &result.indicators {
        header.push(series.indicator_type.to_string());
    }
    header.extend([
        "Position".to_string(),
        "Market Return".to_string(),
        "Strategy".to_string(),
        "Market Equity".to_string(),
        "Strategy Equity".to_string(),
    ]);
    writer.write_record(&header).map_err(csv_error)?;

    for (i, bar) in result.bars.iter().enumerate() {
        let mut row = vec![
            bar.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        for series in &result.indicators {
            row.push(render_point(&series.values[i]));
        }
        row.push(result.positions[i].to_string());
        row.push(render_point(&result.market_returns[i]));
        row.push(render_point(&result.strategy_returns[i]));
        row.push(format!("{:.6}", result.market_equity[i]));
        row.push(format!("{:.6}", result.strategy_equity[i]));
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn render_point(point: &crate::domain::series::SeriesPoint) -> String {
    if point.valid {
        format!("{:.6}", point.value)
    } else {
        String::new()
    }
}

fn csv_error(e: csv::Error) -> FxlabError {
    FxlabError::Data {
        reason: format!("CSV write error: {}", e),
    }
}
