//! Built-in config models
//!
//! Each model is one JSON file in the configuration directory. Field shapes
//! are enforced by `serde`; the remaining rules live in each model's
//! [`ConfigModel::check`].

pub mod database;
pub mod feature;
pub mod my_new_thing;
pub mod subfeature;

pub use database::DatabaseConfig;
pub use feature::{FeatureConfig, SingleFeatureConfig};
pub use my_new_thing::MyNewThingConfig;
pub use subfeature::{SingleSubFeatureConfig, SubFeatureConfig};

use crate::config::registry::ConfigModelRegistry;
use crate::error::ValidationError;

/// Registers every built-in model.
///
/// # Errors
///
/// Returns the first registration conflict.
pub fn register_all(registry: &mut ConfigModelRegistry) -> Result<(), ValidationError> {
    registry.register::<FeatureConfig>()?;
    registry.register::<SubFeatureConfig>()?;
    registry.register::<DatabaseConfig>()?;
    registry.register::<MyNewThingConfig>()?;
    Ok(())
}
