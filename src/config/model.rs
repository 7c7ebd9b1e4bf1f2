//! Typed config model capability
//!
//! Every config type that can be loaded from a directory implements
//! [`ConfigModel`]: it names the file it is read from and turns decoded JSON
//! into a valid instance, or into the full list of field-level violations.

use std::any::{Any, TypeId};
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

// ============================================================================
// Field Violations
// ============================================================================

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member.
    Field(String),
    /// Array element.
    Index(usize),
}

/// Path from the document root to a value, e.g. `features[0].subfeature_names`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// The document root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Extends the path with an object member.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Field(name.into()));
        self
    }

    /// Extends the path with an array index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Segments from the root.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` for the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if `self` is `prefix` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Converts the path of a failed deserialization.
    #[must_use]
    pub fn from_path(path: &serde_path_to_error::Path) -> Self {
        let segments = path
            .iter()
            .filter_map(|segment| match segment {
                serde_path_to_error::Segment::Seq { index } => Some(Segment::Index(*index)),
                serde_path_to_error::Segment::Map { key } => Some(Segment::Field(key.clone())),
                serde_path_to_error::Segment::Enum { variant } => {
                    Some(Segment::Field(variant.clone()))
                }
                serde_path_to_error::Segment::Unknown => None,
            })
            .collect();
        Self { segments }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single field that failed its schema checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Where in the document the problem is.
    pub location: Location,
    /// What is wrong with it.
    pub message: String,
}

impl FieldViolation {
    /// Creates a violation at `location`.
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// Creates a violation that applies to the whole document.
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Location::root(), message)
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

// ============================================================================
// ConfigModel Trait
// ============================================================================

/// Schema and constructor for one config type.
///
/// Instances are immutable once constructed. Decoding shape errors
/// (missing fields, wrong JSON types) come from `serde`; anything decoding
/// cannot express goes in [`ConfigModel::check`].
pub trait ConfigModel: DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// File name this config is loaded from, e.g. `"FeatureConfig.json"`.
    const FILE_NAME: &'static str;

    /// Name of the config type used in logs and error context.
    fn type_name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Field checks run after a successful decode. Returns every violation.
    fn check(&self) -> Vec<FieldViolation> {
        Vec::new()
    }

    /// Builds a valid instance from decoded JSON.
    ///
    /// # Errors
    ///
    /// Returns every field violation found. Decode failures are reported at
    /// the path of the offending field, one violation per field.
    fn from_value(value: Value) -> Result<Self, Vec<FieldViolation>> {
        let config: Self = decode(value)?;

        let violations = config.check();
        if violations.is_empty() {
            Ok(config)
        } else {
            Err(violations)
        }
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Upper bound on decode violations collected from one document.
const MAX_DECODE_VIOLATIONS: usize = 64;

/// Deserializes `value`, collecting one violation per malformed field.
///
/// `serde` stops at the first error. After recording it, the offending
/// value is replaced with the first well-typed placeholder that moves
/// decoding past that path, and decoding is retried. Collection stops when
/// no placeholder gets past a path.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Vec<FieldViolation>> {
    let mut current = value;
    let mut violations = Vec::new();

    loop {
        let (location, message) = match first_decode_error::<T>(&current) {
            Ok(config) if violations.is_empty() => return Ok(config),
            Ok(_) => return Err(violations),
            Err(failure) => failure,
        };
        violations.push(FieldViolation::new(location.clone(), message));

        if violations.len() >= MAX_DECODE_VIOLATIONS {
            return Err(violations);
        }

        let patched = placeholders().into_iter().find_map(|placeholder| {
            let mut candidate = current.clone();
            if !replace_at(&mut candidate, location.segments(), placeholder) {
                return None;
            }
            match first_decode_error::<T>(&candidate) {
                Err((next, _)) if next.starts_with(&location) => None,
                _ => Some(candidate),
            }
        });

        match patched {
            Some(next) => current = next,
            None => return Err(violations),
        }
    }
}

/// Decodes once, returning the failing location and message on error.
///
/// A missing field is located at the field itself rather than at the
/// object that lacks it.
fn first_decode_error<T: DeserializeOwned>(value: &Value) -> Result<T, (Location, String)> {
    serde_path_to_error::deserialize(value.clone()).map_err(|err| {
        let mut location = Location::from_path(err.path());
        let message = err.inner().to_string();
        if let Some(field) = missing_field_name(&message) {
            location = location.field(field);
        }
        (location, message)
    })
}

/// Extracts `name` from serde's ``missing field `name` `` message.
fn missing_field_name(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

/// Values tried in place of a malformed field, scalars before containers.
fn placeholders() -> [Value; 6] {
    [
        Value::Null,
        Value::String(String::new()),
        Value::from(0),
        Value::Bool(false),
        Value::Array(Vec::new()),
        Value::Object(serde_json::Map::new()),
    ]
}

/// Writes `replacement` at `path`, inserting the last member if absent.
fn replace_at(value: &mut Value, path: &[Segment], replacement: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        *value = replacement;
        return true;
    };

    let mut node = value;
    for segment in parents {
        let next = match segment {
            Segment::Field(name) => node.as_object_mut().and_then(|map| map.get_mut(name)),
            Segment::Index(index) => node.as_array_mut().and_then(|items| items.get_mut(*index)),
        };
        let Some(next) = next else {
            return false;
        };
        node = next;
    }

    match last {
        Segment::Field(name) => node
            .as_object_mut()
            .map(|map| map.insert(name.clone(), replacement))
            .is_some(),
        Segment::Index(index) => node
            .as_array_mut()
            .and_then(|items| items.get_mut(*index))
            .map(|slot| *slot = replacement)
            .is_some(),
    }
}

/// Last path segment of a Rust type name.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

// ============================================================================
// Type Tags
// ============================================================================

/// Runtime identity of a config type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigTypeTag {
    /// Rust type identity.
    pub type_id: TypeId,
    /// Config type name.
    pub name: &'static str,
}

impl ConfigTypeTag {
    /// Tag for a config model type.
    #[must_use]
    pub fn of<T: ConfigModel>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::type_name(),
        }
    }
}

impl fmt::Display for ConfigTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Object-safe view of a loaded config instance.
pub trait ErasedConfig: fmt::Debug + Send + Sync {
    /// Upcast for downcasting back to the concrete model.
    fn as_any(&self) -> &dyn Any;
}

impl<T: ConfigModel> ErasedConfig for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
