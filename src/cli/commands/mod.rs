//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod list;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::CrossconfError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), CrossconfError> {
    match cli.command {
        Commands::Validate(args) => validate::run(&args),
        Commands::List(args) => list::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
