//! Cross-config validation
//!
//! Validators are functions over one or more loaded configs. Their
//! parameter types are checked against the model registry when they are
//! registered, and the runner invokes them only when all of those configs
//! loaded successfully.

pub mod feature_subfeature;
pub mod registry;
pub mod runner;

pub use registry::{IntoValidator, Param, Validator, ValidatorFn, ValidatorRegistry};
pub use runner::{Dispatch, ValidationRunner};

use crate::config::registry::ConfigModelRegistry;
use crate::error::ValidationError;

/// Registers every built-in validator.
///
/// The referenced config models must already be in `models`.
///
/// # Errors
///
/// Returns the first signature or duplicate-name error.
pub fn register_all(
    validators: &mut ValidatorRegistry,
    models: &ConfigModelRegistry,
) -> Result<(), ValidationError> {
    validators.register(
        models,
        Validator::new(
            "feature_references_defined_subfeatures",
            feature_subfeature::feature_references_defined_subfeatures,
        ),
    )?;
    Ok(())
}
