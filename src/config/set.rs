//! Loaded config instances keyed by config type.

use std::any::{Any, TypeId};

use indexmap::IndexMap;

use crate::config::model::{ConfigModel, ConfigTypeTag, ErasedConfig};

/// A loaded instance and where it came from.
#[derive(Debug)]
struct Slot {
    tag: ConfigTypeTag,
    file_name: String,
    config: Box<dyn ErasedConfig>,
}

/// Successfully constructed configs, at most one per config type.
///
/// Iteration follows insertion order, which for a directory load is
/// sorted file-name order.
#[derive(Debug, Default)]
pub struct ConfigSet {
    slots: IndexMap<TypeId, Slot>,
}

impl ConfigSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a typed config, replacing any previous instance of `T`.
    pub fn insert<T: ConfigModel>(&mut self, config: T) {
        self.insert_erased(ConfigTypeTag::of::<T>(), T::FILE_NAME, Box::new(config));
    }

    /// Stores an already-erased config under `tag`.
    ///
    /// Returns the file name of the instance it replaced, if any.
    pub fn insert_erased(
        &mut self,
        tag: ConfigTypeTag,
        file_name: impl Into<String>,
        config: Box<dyn ErasedConfig>,
    ) -> Option<String> {
        self.slots
            .insert(
                tag.type_id,
                Slot {
                    tag,
                    file_name: file_name.into(),
                    config,
                },
            )
            .map(|previous| previous.file_name)
    }

    /// Typed access to a loaded config.
    #[must_use]
    pub fn get<T: ConfigModel>(&self) -> Option<&T> {
        self.get_by_id(TypeId::of::<T>())
            .and_then(|any| any.downcast_ref::<T>())
    }

    /// Untyped access to a loaded config.
    #[must_use]
    pub fn get_by_id(&self, type_id: TypeId) -> Option<&dyn Any> {
        self.slots.get(&type_id).map(|slot| slot.config.as_any())
    }

    /// Returns `true` if a config of type `T` is loaded.
    #[must_use]
    pub fn contains<T: ConfigModel>(&self) -> bool {
        self.contains_id(TypeId::of::<T>())
    }

    /// Returns `true` if a config with this type id is loaded.
    #[must_use]
    pub fn contains_id(&self, type_id: TypeId) -> bool {
        self.slots.contains_key(&type_id)
    }

    /// File the config of type `type_id` was loaded from.
    #[must_use]
    pub fn file_name_of(&self, type_id: TypeId) -> Option<&str> {
        self.slots.get(&type_id).map(|slot| slot.file_name.as_str())
    }

    /// Loaded config type names in insertion order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.values().map(|slot| slot.tag.name)
    }

    /// Loaded config type tags in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = ConfigTypeTag> + '_ {
        self.slots.values().map(|slot| slot.tag)
    }

    /// Number of loaded configs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
