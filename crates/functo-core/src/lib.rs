//! Functo Core Object Model
//!
//! This crate provides the runtime object model that functors are captured
//! from and applied to:
//! - Tagged runtime values and declared value kinds
//! - Classes with single inheritance, fields, constructors and methods
//! - A shared, immutable class registry with subtype queries
//! - Dispatch of a method by signature against an object's runtime class

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod class_registry;
pub mod object;
pub mod value;

pub use class_registry::{ClassDef, ClassRegistry, ClassRegistryBuilder};
pub use object::{
    Class, ClassId, ClassKind, Constructor, FieldDef, Method, MethodBody, MethodSignature, Object,
};
pub use value::{FromValue, IntoValue, Value, ValueKind};

/// Object model errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Value did not conform to a declared kind
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected kind
        expected: String,
        /// Actual value type
        got: String,
    },

    /// Class id or name is not registered
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// Class name registered twice
    #[error("Class {0} is already defined")]
    DuplicateClass(String),

    /// Field declared twice along a hierarchy
    #[error("Field {field} is already defined on {class}")]
    DuplicateField {
        /// Class being defined
        class: String,
        /// Field name
        field: String,
    },

    /// Class definition violates an inheritance rule
    #[error("Invalid class {class}: {reason}")]
    InvalidHierarchy {
        /// Class being defined
        class: String,
        /// What went wrong
        reason: String,
    },

    /// Named field does not exist
    #[error("Field {field} does not exist on {class}")]
    FieldNotFound {
        /// Runtime class
        class: String,
        /// Field name
        field: String,
    },

    /// No method matches the requested signature or arguments
    #[error("Method {method} does not exist on {class}")]
    MethodNotFound {
        /// Runtime class
        class: String,
        /// Method signature or call shape
        method: String,
    },

    /// Resolved method has no body
    #[error("Method {method} is abstract on {class}")]
    AbstractMethod {
        /// Runtime class
        class: String,
        /// Method signature
        method: String,
    },

    /// Arguments do not fit the parameter list
    #[error("Method {method} expects ({expected}), got ({got})")]
    ArgumentMismatch {
        /// Method signature
        method: String,
        /// Declared parameter kinds
        expected: String,
        /// Actual argument types
        got: String,
    },

    /// Method body produced a value of the wrong kind
    #[error("Method {method} declares {expected} but returned {got}")]
    ReturnKindMismatch {
        /// Method signature
        method: String,
        /// Declared return kind
        expected: String,
        /// Actual value type
        got: String,
    },

    /// Class cannot be instantiated
    #[error("Cannot instantiate {class}: {reason}")]
    NotInstantiable {
        /// Class name
        class: String,
        /// Why not
        reason: String,
    },

    /// Error raised by a method or constructor body
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Object model result
pub type CoreResult<T> = Result<T, CoreError>;
