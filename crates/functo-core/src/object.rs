//! Object model and class system

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::class_registry::ClassRegistry;
use crate::value::{FromValue, Value, ValueKind};
use crate::{CoreError, CoreResult};

/// Class identifier (index into the owning [`ClassRegistry`])
///
/// Ids are only meaningful together with the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// Root of every non-primitive hierarchy
    pub const OBJECT: ClassId = ClassId(0);
    /// Abstract numeric base class
    pub const NUMBER: ClassId = ClassId(1);
    /// Final boxed 32-bit integer
    pub const INTEGER: ClassId = ClassId(2);
    /// Final boxed boolean
    pub const BOOLEAN: ClassId = ClassId(3);
    /// Final string class
    pub const STRING: ClassId = ClassId(4);
    /// Primitive `int` descriptor
    pub const INT: ClassId = ClassId(5);
    /// Primitive `boolean` descriptor
    pub const BOOL: ClassId = ClassId(6);

    /// Index into the registry's class table
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// How a class may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Instantiable and extensible
    Concrete,
    /// Extensible but not instantiable
    Abstract,
    /// Instantiable but not extensible
    Final,
    /// Descriptor of a primitive kind; neither instantiable nor extensible
    Primitive,
}

impl ClassKind {
    /// Whether a subclass (or stand-in) may be derived from this class
    pub const fn is_extensible(self) -> bool {
        matches!(self, ClassKind::Concrete | ClassKind::Abstract)
    }
}

/// Method signature: name, parameter kinds and return kind
///
/// Two signatures identify the same method when their names and parameter
/// kinds agree; the return kind is not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Parameter kinds in order
    pub params: Vec<ValueKind>,
    /// Declared return kind
    pub ret: ValueKind,
}

impl MethodSignature {
    /// Create a new signature
    pub fn new(
        name: impl Into<String>,
        params: impl IntoIterator<Item = ValueKind>,
        ret: ValueKind,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            ret,
        }
    }

    /// Whether `other` names the same method (name and parameter kinds)
    pub fn matches(&self, other: &MethodSignature) -> bool {
        self.name == other.name && self.params == other.params
    }

    /// Whether this method can be called with `args`
    pub fn accepts_args(&self, args: &[Value]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(kind, arg)| kind.accepts(arg))
    }

    fn check_args(&self, args: &[Value]) -> CoreResult<()> {
        if self.accepts_args(args) {
            return Ok(());
        }
        Err(CoreError::ArgumentMismatch {
            method: self.to_string(),
            expected: join(self.params.iter().map(ToString::to_string)),
            got: join(args.iter().map(|a| a.type_name().to_string())),
        })
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, join(self.params.iter().map(ToString::to_string)))
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

/// Native method implementation
pub type MethodBody = Arc<dyn Fn(&mut Object, &[Value]) -> CoreResult<Value> + Send + Sync>;

/// Native constructor implementation (runs after field initializers)
pub type ConstructorBody = Arc<dyn Fn(&mut Object, &[Value]) -> CoreResult<()> + Send + Sync>;

/// A method declared on a class
#[derive(Clone)]
pub struct Method {
    /// Signature
    pub signature: MethodSignature,
    /// Class that declares this method
    pub declaring: ClassId,
    /// Whether subclasses (and stand-ins) may override it
    pub overridable: bool,
    body: Option<MethodBody>,
}

impl Method {
    pub(crate) fn new(
        signature: MethodSignature,
        declaring: ClassId,
        overridable: bool,
        body: Option<MethodBody>,
    ) -> Self {
        Self {
            signature,
            declaring,
            overridable,
            body,
        }
    }

    /// Whether this method has no body
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("signature", &self.signature.to_string())
            .field("ret", &self.signature.ret)
            .field("declaring", &self.declaring)
            .field("overridable", &self.overridable)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

/// Constructor with its parameter kinds
#[derive(Clone)]
pub struct Constructor {
    /// Parameter kinds in order
    pub params: Vec<ValueKind>,
    pub(crate) body: ConstructorBody,
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

/// Field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared kind
    pub kind: ValueKind,
    /// Value assigned by the field initializer
    pub initial: Value,
}

/// Class definition metadata
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (unique within its registry)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Usage restrictions
    pub kind: ClassKind,
    /// Parent class ID (None for roots and primitives)
    pub parent: Option<ClassId>,
    /// This class followed by every ancestor, nearest first
    pub(crate) ancestors: Vec<ClassId>,
    /// All fields, inherited first
    pub(crate) fields: Vec<FieldDef>,
    /// Field name to storage index
    pub(crate) field_indices: FxHashMap<String, usize>,
    /// Methods declared (not inherited) by this class
    pub(crate) methods: Vec<Arc<Method>>,
    pub(crate) constructor: Option<Constructor>,
}

impl Class {
    /// This class and its ancestors, nearest first
    pub fn ancestors(&self) -> &[ClassId] {
        &self.ancestors
    }

    /// All fields including inherited ones
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Get field index by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    /// Methods declared directly on this class
    pub fn declared_methods(&self) -> &[Arc<Method>] {
        &self.methods
    }

    /// Constructor, if one was declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Find a method declared directly on this class by signature
    pub fn declared_method(&self, sig: &MethodSignature) -> Option<&Arc<Method>> {
        self.methods.iter().find(|m| m.signature.matches(sig))
    }
}

/// Object instance
///
/// Holds a handle to the registry that defines its class, so dispatch always
/// happens against the runtime class rather than any statically assumed one.
#[derive(Clone)]
pub struct Object {
    registry: ClassRegistry,
    class_id: ClassId,
    fields: Vec<Value>,
}

impl Object {
    pub(crate) fn new(registry: ClassRegistry, class_id: ClassId, fields: Vec<Value>) -> Self {
        Self {
            registry,
            class_id,
            fields,
        }
    }

    /// Runtime class ID
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Runtime class
    pub fn class(&self) -> &Class {
        self.registry.class_unchecked(self.class_id)
    }

    /// Runtime class name
    pub fn class_name(&self) -> &str {
        &self.class().name
    }

    /// Registry that defines this object's class
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Whether this object's class is `class` or one of its subclasses
    pub fn is_instance_of(&self, class: ClassId) -> bool {
        self.registry.is_subclass_of(self.class_id, class)
    }

    /// Get a field value by index
    pub fn get_field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Set a field value by index
    pub fn set_field(&mut self, index: usize, value: Value) -> CoreResult<()> {
        let kind = match self.class().fields.get(index) {
            Some(def) => def.kind,
            None => {
                return Err(CoreError::FieldNotFound {
                    class: self.class_name().to_string(),
                    field: format!("#{}", index),
                })
            }
        };
        kind.check(&value)?;
        self.fields[index] = value;
        Ok(())
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn index_of(&self, name: &str) -> CoreResult<usize> {
        self.class()
            .field_index(name)
            .ok_or_else(|| CoreError::FieldNotFound {
                class: self.class_name().to_string(),
                field: name.to_string(),
            })
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> CoreResult<&Value> {
        let index = self.index_of(name)?;
        Ok(&self.fields[index])
    }

    /// Get a field value by name, converted to a Rust type
    pub fn get_as<T: FromValue>(&self, name: &str) -> CoreResult<T> {
        T::from_value(self.get(name)?)
    }

    /// Set a field value by name; the value must conform to the field's kind
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> CoreResult<()> {
        let index = self.index_of(name)?;
        self.set_field(index, value.into())
    }

    /// Mutable access to a field's value
    ///
    /// Used for in-place updates of list fields; the caller is responsible
    /// for keeping the value's kind unchanged.
    pub fn field_mut(&mut self, name: &str) -> CoreResult<&mut Value> {
        let index = self.index_of(name)?;
        Ok(&mut self.fields[index])
    }

    /// Call a method by name, selecting the most-derived overload whose
    /// parameters accept `args`
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> CoreResult<Value> {
        let method = self
            .registry
            .find_method(self.class_id, name, args)
            .cloned()
            .ok_or_else(|| CoreError::MethodNotFound {
                class: self.class_name().to_string(),
                method: format!(
                    "{}({})",
                    name,
                    join(args.iter().map(|a| a.type_name().to_string()))
                ),
            })?;
        self.invoke_method(&method, args)
    }

    /// Call the method matching `sig` on this object's runtime class
    pub fn invoke_signature(&mut self, sig: &MethodSignature, args: &[Value]) -> CoreResult<Value> {
        let method = self
            .registry
            .resolve(self.class_id, sig)
            .cloned()
            .ok_or_else(|| CoreError::MethodNotFound {
                class: self.class_name().to_string(),
                method: sig.to_string(),
            })?;
        self.invoke_method(&method, args)
    }

    /// Run a method body with this object as receiver
    ///
    /// Arguments are checked against the parameter kinds and the result
    /// against the declared return kind.
    pub fn invoke_method(&mut self, method: &Method, args: &[Value]) -> CoreResult<Value> {
        method.signature.check_args(args)?;
        let body = method.body.clone().ok_or_else(|| CoreError::AbstractMethod {
            class: self.class_name().to_string(),
            method: method.signature.to_string(),
        })?;
        let result = body(self, args)?;
        if !method.signature.ret.accepts(&result) {
            return Err(CoreError::ReturnKindMismatch {
                method: method.signature.to_string(),
                expected: method.signature.ret.to_string(),
                got: result.type_name().to_string(),
            });
        }
        Ok(result)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class();
        let mut s = f.debug_struct(&class.name);
        for (def, value) in class.fields.iter().zip(&self.fields) {
            s.field(&def.name, value);
        }
        s.finish()
    }
}
