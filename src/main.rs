use clap::Parser;
use fxlab::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
