//! CLI definition and dispatch.
//!
//! The command layer owns every prompt-free interaction: it loads config and
//! data through the adapters, drives the engine, and formats the structured
//! results. Progress goes to stderr, results to stdout; the core library
//! itself never prints.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{
    build_montecarlo_config, build_strategy_config, validate_montecarlo_config,
    validate_strategy_config,
};
use crate::domain::metrics::RatioSet;
use crate::domain::montecarlo::run_search;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fxlab", about = "Rule-based strategy backtester with Monte Carlo search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a single backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a Monte Carlo parameter search
    Montecarlo {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            output,
        } => run_backtest_command(&config, &data, output.as_deref()),
        Command::Montecarlo {
            config,
            data,
            output,
        } => run_montecarlo_command(&config, &data, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        (&err).into()
    })
}

fn load_bars(path: &Path) -> Result<Vec<crate::domain::ohlcv::OhlcvBar>, ExitCode> {
    eprintln!("Loading bars from {}", path.display());
    CsvAdapter::new(path.to_path_buf())
        .fetch_ohlcv()
        .map_err(|err| {
            eprintln!("error: {err}");
            (&err).into()
        })
}

fn run_backtest_command(
    config_path: &Path,
    data_path: &Path,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let strategy = match build_strategy_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let bars = match load_bars(data_path) {
        Ok(b) => b,
        Err(code) => return code,
    };

    eprintln!("Running backtest: {} @ {}", strategy.kind, strategy.interval);
    let result = match run_backtest(&bars, &strategy) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_ratios(&result.ratios);

    if let Some(path) = output_path {
        if let Err(e) = TextReportAdapter.write_backtest(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_montecarlo_command(
    config_path: &Path,
    data_path: &Path,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let search = match build_montecarlo_config(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let bars = match load_bars(data_path) {
        Ok(b) => b,
        Err(code) => return code,
    };

    eprintln!(
        "Running {} simulations, priority {}",
        search.simulations, search.priority
    );
    let result = match run_search(&bars, &search) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let best = &result.runs[result.best_index];
    let overruns = result
        .runs
        .iter()
        .filter(|run| run.sampling_overrun)
        .count();

    println!(
        "Scored {} of {} simulations ({} skipped, {} sampling overruns)",
        result.runs.len(),
        search.simulations,
        result.skipped.len(),
        overruns
    );
    println!("Best parameters: {} (simulation #{})", best.params, best.index);
    println!();
    print_ratios(&result.best.ratios);

    if let Some(path) = output_path {
        if let Err(e) = TextReportAdapter.write_search(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if adapter.get_string("montecarlo", "simulations").is_some() {
        if let Err(e) = validate_montecarlo_config(&adapter) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    println!("Configuration OK");
    ExitCode::SUCCESS
}

fn print_ratios(ratios: &RatioSet) {
    println!("RATIOS:");
    println!();
    println!("Market return: {:.2}%", ratios.market_return * 100.0);
    println!("Strategy return: {:.2}%", ratios.strategy_return * 100.0);
    println!("Max drawdown: {:.2}%", ratios.max_drawdown);
    println!(
        "Drawdown period: {} bars (index {} -> {})",
        ratios.drawdown_period, ratios.drawdown_start, ratios.drawdown_end
    );
    println!("RAR: {:.2}", ratios.risk_adjusted_return);
}
