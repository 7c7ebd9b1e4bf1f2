//! `crossconf` - multi-file JSON configuration validator

use clap::Parser;

use crossconf::cli::args::Cli;
use crossconf::cli::commands;
use crossconf::error::{CrossconfError, ExitCode};
use crossconf::observability::init_logging;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::SUCCESS
            };
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            match &e {
                // Individual errors were already reported on stdout.
                CrossconfError::Validation(group) => {
                    eprintln!("error: validation failed with {} error(s)", group.len());
                }
                other => eprintln!("error: {other}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}
