//! Validator registry
//!
//! A [`Validator`] pairs a cross-config check with the ordered list of
//! config types it consumes. Typed validators derive that list from their
//! own parameter types, so the declared dependencies and the arguments a
//! check receives can never drift apart. Registration verifies every
//! parameter against the [`ConfigModelRegistry`] and rejects the validator
//! on the spot if one is not a registered config type.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::config::model::ConfigModel;
use crate::config::registry::ConfigModelRegistry;
use crate::error::{ErrorKind, ValidationError};

/// Erased validator body: receives resolved configs in declared order.
pub type ValidatorFn = dyn Fn(&[&dyn Any]) -> Vec<ValidationError> + Send + Sync;

// ============================================================================
// Signature
// ============================================================================

/// One declared validator parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, used in error reports.
    pub name: String,
    /// Declared type identity.
    pub type_id: TypeId,
    /// Declared type name.
    pub type_name: &'static str,
}

impl Param {
    /// A parameter of any `'static` type.
    ///
    /// Whether the type is an acceptable config type is decided at
    /// registration.
    pub fn of<T: Any>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// A parameter of a config model type.
    pub fn config<T: ConfigModel>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: T::type_name(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

// ============================================================================
// Validator
// ============================================================================

/// A named cross-config check and the config types it requires.
#[derive(Clone)]
pub struct Validator {
    name: String,
    params: Vec<Param>,
    func: Arc<ValidatorFn>,
}

impl Validator {
    /// Builds a validator from a typed function or closure.
    ///
    /// Accepts any `Fn(&A, ..) -> Vec<ValidationError>` with one to four
    /// config model parameters.
    pub fn new<Args, F>(name: impl Into<String>, func: F) -> Self
    where
        F: IntoValidator<Args>,
    {
        func.into_validator(name.into())
    }

    /// Builds a validator from an explicit parameter list and an erased body.
    ///
    /// The body receives one argument per entry in `params`, in the same
    /// order, each downcastable to the declared type.
    pub fn from_parts<F>(name: impl Into<String>, params: Vec<Param>, func: F) -> Self
    where
        F: Fn(&[&dyn Any]) -> Vec<ValidationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            func: Arc::new(func),
        }
    }

    /// Validator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Runs the validator on already-resolved arguments.
    #[must_use]
    pub fn invoke(&self, args: &[&dyn Any]) -> Vec<ValidationError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Conversion from a typed function into a [`Validator`].
///
/// `Args` is a tuple of the function's parameter types and only serves to
/// keep the implementations for different arities apart.
pub trait IntoValidator<Args>: Send + Sync + 'static {
    /// Wraps `self` as a validator called `name`.
    fn into_validator(self, name: String) -> Validator;
}

fn argument_mismatch(name: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::InvalidValidatorSignature,
        "Validator received arguments that do not match its signature",
    )
    .with("func", name)
}

macro_rules! impl_into_validator {
    ($($ty:ident $arg:ident),+) => {
        impl<Func, $($ty),+> IntoValidator<($($ty,)+)> for Func
        where
            Func: Fn($(&$ty),+) -> Vec<ValidationError> + Send + Sync + 'static,
            $($ty: ConfigModel,)+
        {
            fn into_validator(self, name: String) -> Validator {
                let params = vec![$(Param::config::<$ty>($ty::type_name())),+];
                let call_name = name.clone();
                Validator::from_parts(name, params, move |args: &[&dyn Any]| {
                    let [$($arg),+] = args else {
                        return vec![argument_mismatch(&call_name)];
                    };
                    let ($(Some($arg),)+) = ($($arg.downcast_ref::<$ty>(),)+) else {
                        return vec![argument_mismatch(&call_name)];
                    };
                    self($($arg),+)
                })
            }
        }
    };
}

impl_into_validator!(A a);
impl_into_validator!(A a, B b);
impl_into_validator!(A a, B b, C c);
impl_into_validator!(A a, B b, C c, D d);

// ============================================================================
// Registry
// ============================================================================

/// Ordered list of registered validators. Order of registration is order
/// of invocation.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: Vec<Validator>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `validator` after checking its signature against `models`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidValidatorSignature`] error naming the
    /// validator and every parameter that is not a registered config type
    /// (or if it declares no parameters at all), and an
    /// [`ErrorKind::DuplicateRegistration`] error if the name is taken.
    /// The registry is left unchanged on error.
    pub fn register(
        &mut self,
        models: &ConfigModelRegistry,
        validator: Validator,
    ) -> Result<&mut Self, ValidationError> {
        if validator.params.is_empty() {
            return Err(ValidationError::new(
                ErrorKind::InvalidValidatorSignature,
                format!(
                    "Function {} declares no config parameters",
                    validator.name
                ),
            )
            .with("func", &validator.name)
            .with("invalid_parameters", "[]"));
        }

        let invalid: Vec<&Param> = validator
            .params
            .iter()
            .filter(|param| !models.contains_type(param.type_id))
            .collect();

        if !invalid.is_empty() {
            let rendered: Vec<String> = invalid.iter().map(ToString::to_string).collect();
            return Err(ValidationError::new(
                ErrorKind::InvalidValidatorSignature,
                format!(
                    "Function {} has parameters in its signature that are not registered config types",
                    validator.name
                ),
            )
            .with("func", &validator.name)
            .with("invalid_parameters", format!("[{}]", rendered.join(", "))));
        }

        if self.get(&validator.name).is_some() {
            return Err(ValidationError::new(
                ErrorKind::DuplicateRegistration,
                "Validator name is already registered",
            )
            .with("func", &validator.name));
        }

        tracing::debug!(
            validator = %validator.name,
            requires = ?validator.params.iter().map(|p| p.type_name).collect::<Vec<_>>(),
            "registered validator"
        );
        self.validators.push(validator);
        Ok(self)
    }

    /// Looks up a validator by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Validator> {
        self.validators.iter().find(|v| v.name == name)
    }

    /// Registered validators in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Validator> {
        self.validators.iter()
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidatorRegistry {
    type Item = &'a Validator;
    type IntoIter = std::slice::Iter<'a, Validator>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
