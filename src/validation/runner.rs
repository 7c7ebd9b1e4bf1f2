//! Validation runner
//!
//! Matches loaded configs against registered validators. A validator runs
//! only when every config type it requires was loaded; otherwise its
//! precondition is unmet and it is skipped without contributing an error.
//! Every eligible validator runs, in registration order, and all of their
//! errors are returned together.

use std::any::Any;

use crate::config::set::ConfigSet;
use crate::error::{ErrorGroup, ValidationError};
use crate::validation::registry::{Validator, ValidatorRegistry};

/// Outcome of matching one validator against a [`ConfigSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// All required configs were present and the validator ran.
    Ran {
        /// Number of errors it returned.
        errors: usize,
    },
    /// At least one required config was missing.
    Skipped {
        /// Type names of the missing configs, in declared order.
        missing: Vec<&'static str>,
    },
}

/// Runs registered validators against loaded configs.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRunner<'r> {
    validators: &'r ValidatorRegistry,
}

impl<'r> ValidationRunner<'r> {
    /// Creates a runner over `validators`.
    #[must_use]
    pub const fn new(validators: &'r ValidatorRegistry) -> Self {
        Self { validators }
    }

    /// Runs every validator whose required configs are all loaded.
    ///
    /// Errors are returned in registration order, each validator's errors
    /// in the order it produced them.
    #[must_use]
    pub fn run(&self, configs: &ConfigSet) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut ran = 0usize;

        for validator in self.validators {
            if matches!(
                dispatch(validator, configs, &mut errors),
                Dispatch::Ran { .. }
            ) {
                ran += 1;
            }
        }

        tracing::info!(
            registered = self.validators.len(),
            ran,
            errors = errors.len(),
            "cross-config validation finished"
        );
        errors
    }

    /// Runs validators and fails if any error was produced.
    ///
    /// # Errors
    ///
    /// Returns every validation error as one [`ErrorGroup`].
    pub fn run_strict(&self, configs: &ConfigSet) -> Result<(), ErrorGroup> {
        ErrorGroup::check(self.run(configs))
    }

    /// Reports, per validator, whether it would run against `configs`.
    ///
    /// Validators are not invoked.
    #[must_use]
    pub fn plan(&self, configs: &ConfigSet) -> Vec<(&'r str, Option<Vec<&'static str>>)> {
        self.validators
            .iter()
            .map(|validator| {
                let missing = missing_types(validator, configs);
                let missing = if missing.is_empty() {
                    None
                } else {
                    Some(missing)
                };
                (validator.name(), missing)
            })
            .collect()
    }
}

/// Resolves one validator's arguments and runs it if they are all present.
fn dispatch(
    validator: &Validator,
    configs: &ConfigSet,
    errors: &mut Vec<ValidationError>,
) -> Dispatch {
    let resolved: Option<Vec<&dyn Any>> = validator
        .params()
        .iter()
        .map(|param| configs.get_by_id(param.type_id))
        .collect();

    let Some(args) = resolved else {
        let missing = missing_types(validator, configs);
        tracing::debug!(
            validator = validator.name(),
            missing = ?missing,
            "skipping validator, required configs not loaded"
        );
        return Dispatch::Skipped { missing };
    };

    let produced = validator.invoke(&args);
    tracing::debug!(
        validator = validator.name(),
        errors = produced.len(),
        "validator ran"
    );
    let count = produced.len();
    errors.extend(produced);
    Dispatch::Ran { errors: count }
}

fn missing_types(validator: &Validator, configs: &ConfigSet) -> Vec<&'static str> {
    validator
        .params()
        .iter()
        .filter(|param| !configs.contains_id(param.type_id))
        .map(|param| param.type_name)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
