//! `validate`: load a config directory and run cross-config validators.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::set::ConfigSet;
use crate::error::{CrossconfError, ErrorGroup, ValidationError};

/// Line printed when no error was collected.
pub const ALL_PASSED: &str = "All validations passed!";

/// Everything one validation pass produced.
#[derive(Debug)]
pub struct Outcome {
    /// Configs that loaded successfully.
    pub configs: ConfigSet,
    /// Load errors followed by cross-config errors.
    pub errors: Vec<ValidationError>,
    /// Whether the cross-config validators were run.
    pub validators_ran: bool,
}

/// Loads `dir` with `catalog` and runs its validators.
///
/// With `strict`, validators are skipped if any file failed to load.
#[must_use]
pub fn validate_dir(catalog: &Catalog, dir: &Path, strict: bool) -> Outcome {
    let (configs, mut errors) = catalog.loader(dir).load().unpack();

    if strict && !errors.is_empty() {
        tracing::warn!(
            errors = errors.len(),
            "strict mode: skipping cross-config validation after load errors"
        );
        return Outcome {
            configs,
            errors,
            validators_ran: false,
        };
    }

    errors.extend(catalog.runner().run(&configs));
    Outcome {
        configs,
        errors,
        validators_ran: true,
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Serialize)]
struct ErrorEntry<'a> {
    kind: &'static str,
    message: &'a str,
    context: &'a IndexMap<String, String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    errors: usize,
    passed: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    configs_loaded: Vec<&'static str>,
    errors: Vec<ErrorEntry<'a>>,
    summary: Summary,
}

/// Every error's rendering on its own line, or [`ALL_PASSED`].
#[must_use]
pub fn render_human(outcome: &Outcome) -> String {
    if outcome.errors.is_empty() {
        return ALL_PASSED.to_string();
    }
    outcome
        .errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Machine-readable report.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(outcome: &Outcome) -> Result<String, serde_json::Error> {
    let report = Report {
        configs_loaded: outcome.configs.type_names().collect(),
        errors: outcome
            .errors
            .iter()
            .map(|e| ErrorEntry {
                kind: e.kind().as_str(),
                message: e.message(),
                context: e.context(),
            })
            .collect(),
        summary: Summary {
            errors: outcome.errors.len(),
            passed: outcome.errors.is_empty(),
        },
    };
    serde_json::to_string_pretty(&report)
}

/// Validate a configuration directory and print the outcome to stdout.
///
/// # Errors
///
/// Returns an I/O error if the directory does not exist, and a validation
/// error carrying every collected error if any occurred.
pub fn run(args: &ValidateArgs) -> Result<(), CrossconfError> {
    if !args.dir.is_dir() {
        return Err(CrossconfError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config directory not found: {}", args.dir.display()),
        )));
    }

    let catalog = Catalog::builtin().map_err(CrossconfError::Registry)?;
    tracing::info!(dir = %args.dir.display(), strict = args.strict, "validating configuration directory");

    let outcome = validate_dir(&catalog, &args.dir, args.strict);

    match args.format {
        OutputFormat::Human => println!("{}", render_human(&outcome)),
        OutputFormat::Json => println!("{}", render_json(&outcome)?),
    }

    ErrorGroup::check(outcome.errors)?;
    Ok(())
}
