//! Mode policy
//!
//! A [`Mode`] decides, for one functional shape, which captured methods are
//! acceptable at synthesis time and how a raw invocation result is turned
//! into the shape's result at application time. Modes are plain values and
//! can be reused across any number of syntheses.

use functo_core::{CoreError, Value};

use crate::capture::CaptureRecord;
use crate::error::{FunctoError, FunctoResult};
use crate::shape::FunctionalShape;

/// What to do when an invocation yields `Null`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NullPolicy {
    /// Fail with [`FunctoError::NullResult`]
    #[default]
    Reject,
    /// Hand `Null` back to the caller
    ///
    /// Boolean-validating modes never hand back `Null`; under them this
    /// behaves like [`NullPolicy::Reject`].
    PassThrough,
    /// Substitute this value
    Default(Value),
}

/// Return-kind policy applied at synthesis time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnValidation {
    /// Declared return kind must be boolean
    Boolean,
    /// Any declared return kind
    Permissive,
    /// Any declared return kind; the result is discarded
    Void,
}

/// Validation and coercion policy bound to a shape
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    shape: FunctionalShape,
    null_policy: NullPolicy,
    validation: ReturnValidation,
    null_safe: bool,
}

impl Mode {
    /// Boolean-validating predicate mode; null results are rejected
    pub fn predicate() -> Self {
        Self {
            shape: FunctionalShape::Predicate,
            null_policy: NullPolicy::Reject,
            validation: ReturnValidation::Boolean,
            null_safe: false,
        }
    }

    /// Predicate mode that answers `default` for null results
    pub fn predicate_or(default: bool) -> Self {
        Self::predicate().with_null_policy(NullPolicy::Default(Value::Bool(default)))
    }

    /// Boolean-validating filter mode
    pub fn filter() -> Self {
        Self {
            shape: FunctionalShape::Filter,
            ..Self::predicate()
        }
    }

    /// Permissive function mode; null results pass through
    pub fn function() -> Self {
        Self {
            shape: FunctionalShape::UnaryFunction,
            null_policy: NullPolicy::PassThrough,
            validation: ReturnValidation::Permissive,
            null_safe: false,
        }
    }

    /// Function mode that substitutes `default` for null results
    pub fn function_or(default: impl Into<Value>) -> Self {
        Self::function().with_null_policy(NullPolicy::Default(default.into()))
    }

    /// Function mode that tolerates an absent target
    pub fn safe_nav() -> Self {
        Self::function().with_null_safe(true)
    }

    /// Void command mode
    pub fn command() -> Self {
        Self {
            shape: FunctionalShape::VoidCommand,
            null_policy: NullPolicy::PassThrough,
            validation: ReturnValidation::Void,
            null_safe: false,
        }
    }

    /// Zero-argument command mode
    pub fn runnable() -> Self {
        Self {
            shape: FunctionalShape::ZeroArgCommand,
            ..Self::command()
        }
    }

    /// Replace the null policy
    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Enable or disable safe navigation
    pub fn with_null_safe(mut self, null_safe: bool) -> Self {
        self.null_safe = null_safe;
        self
    }

    /// Shape this mode was built for
    pub fn shape(&self) -> FunctionalShape {
        self.shape
    }

    /// Null policy
    pub fn null_policy(&self) -> &NullPolicy {
        &self.null_policy
    }

    /// Return-kind policy
    pub fn validation(&self) -> ReturnValidation {
        self.validation
    }

    /// Whether an absent target is tolerated
    pub fn is_null_safe(&self) -> bool {
        self.null_safe
    }

    /// Check that a captured record can be synthesized into `shape`
    pub fn validate(&self, record: &CaptureRecord, shape: FunctionalShape) -> FunctoResult<()> {
        if self.shape.return_kind() != shape.return_kind() {
            return Err(FunctoError::ModeMismatch {
                shape,
                mode_shape: self.shape,
            });
        }
        if self.validation != ReturnValidation::Boolean {
            return Ok(());
        }
        let ret = record.signature().ret;
        if !ret.is_boolean() {
            return Err(FunctoError::IncompatibleReturnKind {
                shape,
                method: record.method(),
                expected: "boolean".to_string(),
                actual: ret.to_string(),
            });
        }
        match &self.null_policy {
            NullPolicy::Default(default) if !matches!(default, Value::Bool(_)) => {
                Err(FunctoError::InvalidNullDefault {
                    shape,
                    default: default.type_name().to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Turn a raw invocation result into the shape's result
    pub fn coerce(&self, record: &CaptureRecord, raw: Value) -> FunctoResult<Value> {
        match self.validation {
            ReturnValidation::Void => {
                if !raw.is_void() {
                    tracing::trace!(method = %record.signature(), "discarded command result");
                }
                Ok(Value::Void)
            }
            ReturnValidation::Boolean => match raw {
                Value::Bool(_) => Ok(raw),
                Value::Null => match &self.null_policy {
                    NullPolicy::Default(value) => Ok(value.clone()),
                    NullPolicy::Reject | NullPolicy::PassThrough => Err(FunctoError::NullResult {
                        shape: self.shape,
                        method: record.method(),
                    }),
                },
                other => Err(CoreError::ReturnKindMismatch {
                    method: record.method(),
                    expected: "boolean".to_string(),
                    got: other.type_name().to_string(),
                }
                .into()),
            },
            ReturnValidation::Permissive => match (raw, &self.null_policy) {
                (Value::Null, NullPolicy::Default(value)) => Ok(value.clone()),
                (Value::Null, NullPolicy::Reject) => Err(FunctoError::NullResult {
                    shape: self.shape,
                    method: record.method(),
                }),
                (raw, _) => Ok(raw),
            },
        }
    }

    /// Result of applying to an absent target
    pub fn null_target(&self, record: &CaptureRecord) -> FunctoResult<Value> {
        if self.null_safe {
            self.coerce(record, Value::Null)
        } else {
            Err(FunctoError::NullTarget {
                method: record.method(),
            })
        }
    }
}
