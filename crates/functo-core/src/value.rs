//! Runtime values and declared value kinds
//!
//! Every field, argument and method result in the object model is a
//! [`Value`]. Declarations (field types, parameter lists, return types) are
//! expressed as a [`ValueKind`], which decides which values conform and what
//! the zero-like placeholder of that kind is.
//!
//! # Nullability
//!
//! ```text
//! primitive kinds:  Bool Byte Short Int Long Float Double Char   (never null)
//! reference kinds:  BoxedBool Str List Any                         (may be null)
//! no value:         Void
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{CoreError, CoreResult};

/// A runtime value
#[derive(Clone, PartialEq, Default)]
pub enum Value {
    /// Result of a method that returns nothing
    Void,
    /// The null reference
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Unicode scalar
    Char(char),
    /// Immutable string
    Str(Arc<str>),
    /// Ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an i32 value
    #[inline]
    pub const fn i32(i: i32) -> Self {
        Value::Int(i)
    }

    /// Create an i64 value
    #[inline]
    pub const fn i64(i: i64) -> Self {
        Value::Long(i)
    }

    /// Create an f64 value
    #[inline]
    pub const fn f64(f: f64) -> Self {
        Value::Double(f)
    }

    /// Create a string value
    pub fn str(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Create a list value
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Check if this value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is the void marker
    #[inline]
    pub const fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Extract boolean value
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer that fits in 32 bits (Byte, Short and Int widen)
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Byte(b) => Some(*b as i32),
            Value::Short(s) => Some(*s as i32),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract any integer as 64 bits
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(l) => Some(*l),
            _ => match self.as_i32() {
                Some(i) => Some(i as i64),
                None => None,
            },
        }
    }

    /// Extract a floating point value (Float widens)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Borrow list elements
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Mutably borrow list elements
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get type name for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "String",
            Value::List(_) => "List",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "bool({})", b),
            Value::Byte(b) => write!(f, "byte({})", b),
            Value::Short(s) => write!(f, "short({})", s),
            Value::Int(i) => write!(f, "i32({})", i),
            Value::Long(l) => write!(f, "i64({})", l),
            Value::Float(x) => write!(f, "f32({})", x),
            Value::Double(x) => write!(f, "f64({})", x),
            Value::Char(c) => write!(f, "char({:?})", c),
            Value::Str(s) => write!(f, "str({:?})", s),
            Value::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Byte(b) => write!(f, "{}", b),
            Value::Short(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Long(l) => write!(f, "{}", l),
            Value::Float(x) => write!(f, "{}", x),
            Value::Double(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Declared kind of a field, parameter or method result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value (method results only)
    Void,
    /// Primitive boolean
    Bool,
    /// Primitive 8-bit integer
    Byte,
    /// Primitive 16-bit integer
    Short,
    /// Primitive 32-bit integer
    Int,
    /// Primitive 64-bit integer
    Long,
    /// Primitive 32-bit float
    Float,
    /// Primitive 64-bit float
    Double,
    /// Primitive character
    Char,
    /// Nullable boolean reference
    BoxedBool,
    /// Nullable string reference
    Str,
    /// Nullable list reference
    List,
    /// Any value, including null
    Any,
}

impl ValueKind {
    /// Whether values of this kind are primitives (never null)
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueKind::Bool
                | ValueKind::Byte
                | ValueKind::Short
                | ValueKind::Int
                | ValueKind::Long
                | ValueKind::Float
                | ValueKind::Double
                | ValueKind::Char
        )
    }

    /// Whether values of this kind may be null
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            ValueKind::BoxedBool | ValueKind::Str | ValueKind::List | ValueKind::Any
        )
    }

    /// Whether this kind yields a boolean (primitive or boxed)
    pub const fn is_boolean(self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::BoxedBool)
    }

    /// Zero-like value of this kind
    ///
    /// This table is what an intercepted call hands back to its caller:
    /// numeric zero of the matching width, `false`, `'\0'`, null for
    /// references and void for void.
    pub fn placeholder(self) -> Value {
        match self {
            ValueKind::Void => Value::Void,
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Byte => Value::Byte(0),
            ValueKind::Short => Value::Short(0),
            ValueKind::Int => Value::Int(0),
            ValueKind::Long => Value::Long(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Double => Value::Double(0.0),
            ValueKind::Char => Value::Char('\0'),
            ValueKind::BoxedBool | ValueKind::Str | ValueKind::List | ValueKind::Any => {
                Value::Null
            }
        }
    }

    /// Check whether `value` conforms to this kind
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Void, Value::Void) => true,
            (ValueKind::Void, _) | (_, Value::Void) => false,
            (ValueKind::Any, _) => true,
            (kind, Value::Null) => kind.is_reference(),
            (ValueKind::Bool | ValueKind::BoxedBool, Value::Bool(_)) => true,
            (ValueKind::Byte, Value::Byte(_)) => true,
            (ValueKind::Short, Value::Short(_)) => true,
            (ValueKind::Int, Value::Int(_)) => true,
            (ValueKind::Long, Value::Long(_)) => true,
            (ValueKind::Float, Value::Float(_)) => true,
            (ValueKind::Double, Value::Double(_)) => true,
            (ValueKind::Char, Value::Char(_)) => true,
            (ValueKind::Str, Value::Str(_)) => true,
            (ValueKind::List, Value::List(_)) => true,
            _ => false,
        }
    }

    /// Check that `value` conforms, reporting a type mismatch otherwise
    pub fn check(self, value: &Value) -> CoreResult<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(CoreError::TypeMismatch {
                expected: self.to_string(),
                got: value.type_name().to_string(),
            })
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Void => "void",
            ValueKind::Bool => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Char => "char",
            ValueKind::BoxedBool => "Boolean",
            ValueKind::Str => "String",
            ValueKind::List => "List",
            ValueKind::Any => "Object",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Value Conversion Traits
// ============================================================================

/// Convert from a [`Value`] to a Rust type.
pub trait FromValue: Sized {
    /// Convert, returning an error if the value has the wrong kind.
    fn from_value(value: &Value) -> CoreResult<Self>;
}

/// Convert from a Rust type to a [`Value`].
pub trait IntoValue {
    /// Convert to a value.
    fn into_value(self) -> Value;
}

fn mismatch(expected: &str, value: &Value) -> CoreError {
    CoreError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value.as_i32().ok_or_else(|| mismatch("int", value))
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value.as_i64().ok_or_else(|| mismatch("long", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("double", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("String", value))
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> CoreResult<Self> {
        value
            .as_list()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| mismatch("List", value))
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> CoreResult<Self> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Void
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i8 {
    fn into_value(self) -> Value {
        Value::Byte(self)
    }
}

impl IntoValue for i16 {
    fn into_value(self) -> Value {
        Value::Short(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::str(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(Arc::from(self))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    v.into_value()
                }
            }
        )*
    };
}

value_from!(bool, i8, i16, i32, i64, f32, f64, char, &str, String);
