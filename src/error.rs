//! Error types for `crossconf`
//!
//! Two layers live here. [`ValidationError`] and [`ErrorGroup`] form the
//! structured error model that loading and validation accumulate as data:
//! a message plus named context attributes, and an ordered group of those.
//! [`CrossconfError`] is the top-level error the CLI maps to an exit code.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

/// Line printed between members of a rendered [`ErrorGroup`].
pub const GROUP_DIVIDER: &str =
    "################################################################################";

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `crossconf` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution, no errors collected
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// At least one configuration or cross-configuration error was collected
    pub const VALIDATION_FAILED: i32 = 2;

    /// I/O error (directory not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Error Model
// ============================================================================

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A file could not be read or decoded as JSON.
    ConfigCreation,
    /// One field of one config failed its schema checks.
    SingleConfig,
    /// A rule spanning several loaded configs was violated.
    CrossConfig,
    /// A validator declared a parameter that is not a registered config type.
    InvalidValidatorSignature,
    /// A config model or validator was registered twice.
    DuplicateRegistration,
}

impl ErrorKind {
    /// Stable snake-case name, used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigCreation => "config_creation",
            Self::SingleConfig => "single_config",
            Self::CrossConfig => "cross_config",
            Self::InvalidValidatorSignature => "invalid_validator_signature",
            Self::DuplicateRegistration => "duplicate_registration",
        }
    }

    /// Returns `true` for errors produced while loading individual files.
    #[must_use]
    pub const fn is_load_error(self) -> bool {
        matches!(self, Self::ConfigCreation | Self::SingleConfig)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured error: a message plus open-ended named context.
///
/// Context attributes keep their insertion order, which is also the order
/// they are rendered in.
#[derive(Debug, Clone)]
pub struct ValidationError {
    kind: ErrorKind,
    message: String,
    context: IndexMap<String, String>,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl ValidationError {
    /// Creates an error of the given kind with no context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: IndexMap::new(),
            source: None,
        }
    }

    /// Shorthand for a [`ErrorKind::CrossConfig`] error.
    pub fn cross_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CrossConfig, message)
    }

    /// Shorthand for a [`ErrorKind::SingleConfig`] error.
    pub fn single_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SingleConfig, message)
    }

    /// Shorthand for a [`ErrorKind::ConfigCreation`] error.
    pub fn config_creation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigCreation, message)
    }

    /// Adds a context attribute. Re-using a key replaces its value in place.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// The error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message, without the `ERROR:` prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Looks up one context attribute.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    /// All context attributes in insertion order.
    #[must_use]
    pub const fn context(&self) -> &IndexMap<String, String> {
        &self.context
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.message)?;
        for (key, value) in &self.context {
            write!(f, "\n{key}={value}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl PartialEq for ValidationError {
    /// Compares by content. The attached cause is not part of equality.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message && self.context == other.context
    }
}

impl Eq for ValidationError {}

/// Several [`ValidationError`]s joined into one failure.
///
/// Strict mode returns this so callers can still walk every individual
/// error after aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorGroup {
    errors: Vec<ValidationError>,
}

impl ErrorGroup {
    /// Groups the given errors, preserving their order.
    #[must_use]
    pub const fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns `Err(group)` when `errors` is non-empty, `Ok(())` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the grouped errors if there is at least one.
    pub fn check(errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::new(errors))
        }
    }

    /// The member errors in order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Number of member errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if the group holds no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the group back into its members.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ErrorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "\n{GROUP_DIVIDER}\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorGroup {}

impl IntoIterator for ErrorGroup {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorGroup {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `crossconf` operations.
///
/// Aggregates the failures the CLI can hit and maps each to an exit code.
#[derive(Debug, Error)]
pub enum CrossconfError {
    /// Registration of a config model or validator failed
    #[error("registration failed: {0}")]
    Registry(ValidationError),

    /// Loading or validation collected one or more errors
    #[error("{count} error(s) collected:\n{0}", count = .0.len())]
    Validation(#[from] ErrorGroup),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrossconfError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => ExitCode::VALIDATION_FAILED,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Registry(_) | Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `crossconf` operations.
pub type Result<T> = std::result::Result<T, CrossconfError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::VALIDATION_FAILED, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_render_without_context() {
        let err = ValidationError::cross_config("something broke");
        assert_eq!(err.to_string(), "ERROR: something broke");
    }

    #[test]
    fn test_render_context_in_insertion_order() {
        let err = ValidationError::single_config("bad field")
            .with("config_file", "FeatureConfig.json")
            .with("location", "features[0].name");
        assert_eq!(
            err.to_string(),
            "ERROR: bad field\nconfig_file=FeatureConfig.json\nlocation=features[0].name"
        );
    }

    #[test]
    fn test_with_replaces_existing_key_in_place() {
        let err = ValidationError::cross_config("x")
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        assert_eq!(err.to_string(), "ERROR: x\na=3\nb=2");
    }

    #[test]
    fn test_attr_lookup() {
        let err = ValidationError::cross_config("x").with("undefined_subfeature", "sub_3");
        assert_eq!(err.attr("undefined_subfeature"), Some("sub_3"));
        assert_eq!(err.attr("missing"), None);
        assert_eq!(err.kind(), ErrorKind::CrossConfig);
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ValidationError::config_creation("cannot read").with_source(io);
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "gone");
    }

    #[test]
    fn test_equality_ignores_source() {
        let io = std::io::Error::other("cause");
        let a = ValidationError::config_creation("m").with("k", "v");
        let b = ValidationError::config_creation("m")
            .with("k", "v")
            .with_source(io);
        assert_eq!(a, b);
        assert_ne!(a, ValidationError::single_config("m").with("k", "v"));
    }

    #[test]
    fn test_group_render_uses_divider() {
        let group = ErrorGroup::new(vec![
            ValidationError::cross_config("first").with("k", "1"),
            ValidationError::cross_config("second"),
        ]);
        assert_eq!(
            group.to_string(),
            format!("ERROR: first\nk=1\n{GROUP_DIVIDER}\nERROR: second")
        );
        assert_eq!(GROUP_DIVIDER.len(), 80);
    }

    #[test]
    fn test_group_exposes_members() {
        let group = ErrorGroup::new(vec![
            ValidationError::cross_config("a"),
            ValidationError::cross_config("b"),
        ]);
        assert_eq!(group.len(), 2);
        let messages: Vec<&str> = group.errors().iter().map(ValidationError::message).collect();
        assert_eq!(messages, vec!["a", "b"]);
        let owned: Vec<ValidationError> = group.into_iter().collect();
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn test_group_check() {
        assert!(ErrorGroup::check(Vec::new()).is_ok());
        let err = ErrorGroup::check(vec![ValidationError::cross_config("a")]).unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ConfigCreation.to_string(), "config_creation");
        assert_eq!(
            ErrorKind::InvalidValidatorSignature.as_str(),
            "invalid_validator_signature"
        );
        assert!(ErrorKind::SingleConfig.is_load_error());
        assert!(!ErrorKind::CrossConfig.is_load_error());
    }

    #[test]
    fn test_validation_error_exit_code() {
        let err: CrossconfError = ErrorGroup::new(vec![ValidationError::cross_config("a")]).into();
        assert_eq!(err.exit_code(), ExitCode::VALIDATION_FAILED);
        assert!(err.to_string().starts_with("1 error(s) collected:"));
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: CrossconfError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_registry_error_exit_code() {
        let err = CrossconfError::Registry(ValidationError::new(
            ErrorKind::DuplicateRegistration,
            "dup",
        ));
        assert_eq!(err.exit_code(), ExitCode::ERROR);
        assert!(err.to_string().contains("ERROR: dup"));
    }
}
