//! Config model registry
//!
//! Maps a file name to the typed constructor of the config stored in it.
//! Each file name and each config type may be registered once; a second
//! registration of either is rejected and leaves the registry unchanged.

use std::any::TypeId;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::model::{ConfigModel, ConfigTypeTag, ErasedConfig, FieldViolation};
use crate::error::{ErrorKind, ValidationError};

/// Type-erased constructor stored per registered model.
pub type Constructor = fn(Value) -> Result<Box<dyn ErasedConfig>, Vec<FieldViolation>>;

/// A registered config model.
#[derive(Debug, Clone, Copy)]
pub struct ModelEntry {
    /// File name the model is loaded from.
    pub file_name: &'static str,
    /// Config type identity.
    pub tag: ConfigTypeTag,
    construct: Constructor,
}

impl ModelEntry {
    /// Runs the model's constructor on decoded JSON.
    ///
    /// # Errors
    ///
    /// Returns the model's field violations.
    pub fn construct(&self, value: Value) -> Result<Box<dyn ErasedConfig>, Vec<FieldViolation>> {
        (self.construct)(value)
    }
}

fn construct_erased<T: ConfigModel>(
    value: Value,
) -> Result<Box<dyn ErasedConfig>, Vec<FieldViolation>> {
    T::from_value(value).map(|config| Box::new(config) as Box<dyn ErasedConfig>)
}

/// Registry of loadable config models, in registration order.
#[derive(Debug, Default)]
pub struct ConfigModelRegistry {
    by_file: IndexMap<&'static str, ModelEntry>,
}

impl ConfigModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `T::FILE_NAME`.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::DuplicateRegistration`] error if the file
    /// name is already taken or `T` is already registered under another
    /// file name.
    pub fn register<T: ConfigModel>(&mut self) -> Result<(), ValidationError> {
        let tag = ConfigTypeTag::of::<T>();

        if let Some(existing) = self.by_file.get(T::FILE_NAME) {
            return Err(ValidationError::new(
                ErrorKind::DuplicateRegistration,
                "Config file name is already registered",
            )
            .with("config_file", T::FILE_NAME)
            .with("registered_type", existing.tag)
            .with("rejected_type", tag));
        }

        if let Some(existing) = self.entry_for_type(tag.type_id) {
            return Err(ValidationError::new(
                ErrorKind::DuplicateRegistration,
                "Config type is already registered under another file name",
            )
            .with("config_type", tag)
            .with("registered_file", existing.file_name)
            .with("rejected_file", T::FILE_NAME));
        }

        tracing::debug!(
            config_file = T::FILE_NAME,
            config_type = tag.name,
            "registered config model"
        );
        self.by_file.insert(
            T::FILE_NAME,
            ModelEntry {
                file_name: T::FILE_NAME,
                tag,
                construct: construct_erased::<T>,
            },
        );
        Ok(())
    }

    /// Looks up the model registered for a file name.
    #[must_use]
    pub fn lookup(&self, file_name: &str) -> Option<&ModelEntry> {
        self.by_file.get(file_name)
    }

    /// Returns `true` if `type_id` belongs to a registered model.
    #[must_use]
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.entry_for_type(type_id).is_some()
    }

    /// Looks up the model registered for a config type.
    #[must_use]
    pub fn entry_for_type(&self, type_id: TypeId) -> Option<&ModelEntry> {
        self.by_file.values().find(|e| e.tag.type_id == type_id)
    }

    /// Registered file names in registration order.
    pub fn file_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_file.keys().copied()
    }

    /// Registered models in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &ModelEntry> {
        self.by_file.values()
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    /// Closest registered file name to `file_name`, for typo hints.
    ///
    /// Returns a match only if its Damerau-Levenshtein distance is at most 3.
    #[must_use]
    pub fn suggest(&self, file_name: &str) -> Option<&'static str> {
        self.by_file
            .keys()
            .map(|name| (*name, strsim::damerau_levenshtein(file_name, name)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name)
    }
}

// ============================================================================
// Tests
// ============================================================================
