// polymatch-find: report every occurrence of a set of literal patterns.
//
// Usage:
//   polymatch-find [-p PATTERNS] [-e PATTERN]... [OPTIONS] [FILE...]
//
// Exit status is 0 when something matched, 1 when nothing did and 2 on
// error. Set POLYMATCH_LOG (e.g. POLYMATCH_LOG=debug) for diagnostics on
// stderr.

use std::io;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use polymatch_cli::ExitCode;
use polymatch_cli::config::{Cli, FindConfig};

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("POLYMATCH_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let config = FindConfig::from(Cli::parse());
    let stdout = io::stdout();
    let out = io::BufWriter::new(stdout.lock());

    let exit_code = match polymatch_cli::run(&config, out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("polymatch-find: {e:#}");
            ExitCode::Error
        }
    };

    std::process::exit(exit_code as i32);
}
