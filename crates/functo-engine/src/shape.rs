//! Functional shapes
//!
//! A shape fixes how many arguments a synthesized functor takes and what
//! kind of result it produces. Adapters map their own interface vocabulary
//! onto these tags.

use std::fmt;

/// Logical result kind of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeReturn {
    /// Any value
    Value,
    /// A boolean
    Boolean,
    /// Nothing
    None,
}

/// Functional shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalShape {
    /// `T -> V`
    UnaryFunction,
    /// `T -> bool`
    Predicate,
    /// `T -> bool`, under the filter vocabulary
    Filter,
    /// `() -> ()` against a target bound at synthesis
    ZeroArgCommand,
    /// `T -> ()`
    VoidCommand,
}

impl FunctionalShape {
    /// Number of arguments the functor accepts when applied
    pub const fn arity(self) -> usize {
        match self {
            FunctionalShape::ZeroArgCommand => 0,
            _ => 1,
        }
    }

    /// Result kind the functor produces
    pub const fn return_kind(self) -> ShapeReturn {
        match self {
            FunctionalShape::UnaryFunction => ShapeReturn::Value,
            FunctionalShape::Predicate | FunctionalShape::Filter => ShapeReturn::Boolean,
            FunctionalShape::ZeroArgCommand | FunctionalShape::VoidCommand => ShapeReturn::None,
        }
    }
}

impl fmt::Display for FunctionalShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionalShape::UnaryFunction => "function",
            FunctionalShape::Predicate => "predicate",
            FunctionalShape::Filter => "filter",
            FunctionalShape::ZeroArgCommand => "runnable",
            FunctionalShape::VoidCommand => "command",
        };
        f.write_str(name)
    }
}
