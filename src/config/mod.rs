//! Configuration module
//!
//! Typed config models, the registry that maps file names to them, and the
//! loader that turns a directory of JSON files into a [`ConfigSet`] plus
//! the errors of every file that failed.

pub mod loader;
pub mod model;
pub mod registry;
pub mod set;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoaderOptions};
pub use model::{ConfigModel, ConfigTypeTag, ErasedConfig, FieldViolation, Location, Segment};
pub use registry::{ConfigModelRegistry, ModelEntry};
pub use set::ConfigSet;
