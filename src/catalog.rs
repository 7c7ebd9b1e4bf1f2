//! Built-in catalog of config models and validators.
//!
//! [`Catalog::builtin`] is the single place that lists every model and
//! validator the binary knows about. Registration happens once, in the
//! order written there, and the catalog is read-only afterwards.

use std::path::PathBuf;

use crate::config::loader::{ConfigLoader, LoaderOptions};
use crate::config::registry::ConfigModelRegistry;
use crate::error::ValidationError;
use crate::validation::registry::ValidatorRegistry;
use crate::validation::runner::ValidationRunner;

/// Model and validator registries built together.
#[derive(Debug, Default)]
pub struct Catalog {
    models: ConfigModelRegistry,
    validators: ValidatorRegistry,
}

impl Catalog {
    /// Builds a catalog from already-populated registries.
    #[must_use]
    pub const fn new(models: ConfigModelRegistry, validators: ValidatorRegistry) -> Self {
        Self { models, validators }
    }

    /// Registers every built-in model, then every built-in validator.
    ///
    /// # Errors
    ///
    /// Returns the first registration error. This indicates a programming
    /// error in the built-in lists, not bad input.
    pub fn builtin() -> Result<Self, ValidationError> {
        let mut models = ConfigModelRegistry::new();
        crate::models::register_all(&mut models)?;

        let mut validators = ValidatorRegistry::new();
        crate::validation::register_all(&mut validators, &models)?;

        tracing::debug!(
            models = models.len(),
            validators = validators.len(),
            "built-in catalog ready"
        );
        Ok(Self::new(models, validators))
    }

    /// Registered config models.
    #[must_use]
    pub const fn models(&self) -> &ConfigModelRegistry {
        &self.models
    }

    /// Registered validators.
    #[must_use]
    pub const fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Loader over `configs_dir` with limits taken from the environment.
    #[must_use]
    pub fn loader(&self, configs_dir: impl Into<PathBuf>) -> ConfigLoader<'_> {
        ConfigLoader::new(&self.models, LoaderOptions::for_dir(configs_dir))
    }

    /// Runner over the registered validators.
    #[must_use]
    pub const fn runner(&self) -> ValidationRunner<'_> {
        ValidationRunner::new(&self.validators)
    }
}
