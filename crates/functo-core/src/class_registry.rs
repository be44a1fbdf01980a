//! Class registry and class definitions
//!
//! Classes are described with a [`ClassDef`], registered through a
//! [`ClassRegistryBuilder`], and frozen into a [`ClassRegistry`]: a cheap,
//! clonable, thread-safe handle that every [`Object`] keeps so it can
//! dispatch against its own runtime class.
//!
//! ## Well-known classes
//!
//! | ID | Name      | Kind      | Parent  |
//! |----|-----------|-----------|---------|
//! | 0  | `Object`  | concrete  | -       |
//! | 1  | `Number`  | abstract  | Object  |
//! | 2  | `Integer` | final     | Number  |
//! | 3  | `Boolean` | final     | Object  |
//! | 4  | `String`  | final     | Object  |
//! | 5  | `int`     | primitive | -       |
//! | 6  | `boolean` | primitive | -       |

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::object::{
    Class, ClassId, ClassKind, Constructor, ConstructorBody, FieldDef, Method, MethodBody,
    MethodSignature, Object,
};
use crate::value::{Value, ValueKind};
use crate::{CoreError, CoreResult};

/// Definition for a class to be registered
pub struct ClassDef {
    name: String,
    kind: ClassKind,
    parent: Option<ClassId>,
    fields: Vec<FieldDef>,
    methods: Vec<(MethodSignature, bool, Option<MethodBody>)>,
    constructor: Option<Constructor>,
}

impl ClassDef {
    /// Start a concrete class extending `Object`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructor: None,
        }
    }

    /// Set the parent class
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Mark as final (no subclasses, no stand-ins)
    pub fn final_class(mut self) -> Self {
        self.kind = ClassKind::Final;
        self
    }

    /// Mark as abstract (not instantiable)
    pub fn abstract_class(mut self) -> Self {
        self.kind = ClassKind::Abstract;
        self
    }

    fn primitive(mut self) -> Self {
        self.kind = ClassKind::Primitive;
        self
    }

    /// Add a field initialized to the zero-like value of its kind
    pub fn field(self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.field_init(name, kind, kind.placeholder())
    }

    /// Add a field with an explicit initial value
    pub fn field_init(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        initial: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind,
            initial: initial.into(),
        });
        self
    }

    /// Add an overridable method
    pub fn method<F>(mut self, signature: MethodSignature, body: F) -> Self
    where
        F: Fn(&mut Object, &[Value]) -> CoreResult<Value> + Send + Sync + 'static,
    {
        self.methods.push((signature, true, Some(Arc::new(body))));
        self
    }

    /// Add a method that subclasses cannot override
    pub fn final_method<F>(mut self, signature: MethodSignature, body: F) -> Self
    where
        F: Fn(&mut Object, &[Value]) -> CoreResult<Value> + Send + Sync + 'static,
    {
        self.methods.push((signature, false, Some(Arc::new(body))));
        self
    }

    /// Add a method without a body
    pub fn abstract_method(mut self, signature: MethodSignature) -> Self {
        self.methods.push((signature, true, None));
        self
    }

    /// Set the constructor; it runs after the field initializers
    pub fn constructor<F>(mut self, params: impl IntoIterator<Item = ValueKind>, body: F) -> Self
    where
        F: Fn(&mut Object, &[Value]) -> CoreResult<()> + Send + Sync + 'static,
    {
        let body: ConstructorBody = Arc::new(body);
        self.constructor = Some(Constructor {
            params: params.into_iter().collect(),
            body,
        });
        self
    }
}

struct RegistryInner {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, ClassId>,
}

/// Registry of class definitions
///
/// Immutable once built and cheap to clone; shared by every object it
/// creates.
#[derive(Clone)]
pub struct ClassRegistry {
    inner: Arc<RegistryInner>,
}

impl ClassRegistry {
    /// Create a registry builder preloaded with the well-known classes
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder::new()
    }

    /// Registry holding only the well-known classes
    pub fn standard() -> Self {
        Self::builder().build()
    }

    /// Get class by ID
    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.inner.classes.get(id.index())
    }

    pub(crate) fn class_unchecked(&self, id: ClassId) -> &Class {
        &self.inner.classes[id.index()]
    }

    /// Get class by ID, reporting unknown ids
    pub fn require(&self, id: ClassId) -> CoreResult<&Class> {
        self.class(id)
            .ok_or_else(|| CoreError::UnknownClass(id.to_string()))
    }

    /// Get class by name
    pub fn class_by_name(&self, name: &str) -> Option<&Class> {
        self.inner
            .name_to_id
            .get(name)
            .and_then(|id| self.class(*id))
    }

    /// Name of a class, or a placeholder for unknown ids
    pub fn name_of(&self, id: ClassId) -> &str {
        self.class(id).map(|c| c.name.as_str()).unwrap_or("<unknown>")
    }

    /// Get the number of registered classes
    pub fn len(&self) -> usize {
        self.inner.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.inner.classes.is_empty()
    }

    /// Check if `sub` is `sup` or extends it, directly or transitively
    pub fn is_subclass_of(&self, sub: ClassId, sup: ClassId) -> bool {
        self.class(sub)
            .map(|c| c.ancestors.contains(&sup))
            .unwrap_or(false)
    }

    /// Most-derived method matching `sig` visible from `class`
    pub fn resolve(&self, class: ClassId, sig: &MethodSignature) -> Option<&Arc<Method>> {
        let class = self.class(class)?;
        class
            .ancestors
            .iter()
            .filter_map(|id| self.class(*id))
            .find_map(|c| c.declared_method(sig))
    }

    /// Most-derived method named `name` whose parameters accept `args`
    pub fn find_method(&self, class: ClassId, name: &str, args: &[Value]) -> Option<&Arc<Method>> {
        let class = self.class(class)?;
        class
            .ancestors
            .iter()
            .filter_map(|id| self.class(*id))
            .find_map(|c| {
                c.methods
                    .iter()
                    .find(|m| m.signature.name == name && m.signature.accepts_args(args))
            })
    }

    /// Every method visible from `class`, most-derived override only
    pub fn visible_methods(&self, class: ClassId) -> Vec<Arc<Method>> {
        let mut seen: Vec<Arc<Method>> = Vec::new();
        if let Some(class) = self.class(class) {
            for c in class.ancestors.iter().filter_map(|id| self.class(*id)) {
                for m in &c.methods {
                    if !seen.iter().any(|s| s.signature.matches(&m.signature)) {
                        seen.push(m.clone());
                    }
                }
            }
        }
        seen
    }

    /// Allocate an object without running initializers or constructors
    ///
    /// Every field holds the zero-like value of its kind. Abstract classes
    /// may be allocated this way; primitive descriptors may not.
    pub fn allocate(&self, class: ClassId) -> CoreResult<Object> {
        let c = self.require(class)?;
        if c.kind == ClassKind::Primitive {
            return Err(CoreError::NotInstantiable {
                class: c.name.clone(),
                reason: "primitive types have no instances".to_string(),
            });
        }
        let fields = c.fields.iter().map(|f| f.kind.placeholder()).collect();
        Ok(Object::new(self.clone(), class, fields))
    }

    /// Create an instance: field initializers, then the constructor
    pub fn instantiate(&self, class: ClassId, args: &[Value]) -> CoreResult<Object> {
        let c = self.require(class)?;
        match c.kind {
            ClassKind::Abstract => {
                return Err(CoreError::NotInstantiable {
                    class: c.name.clone(),
                    reason: "class is abstract".to_string(),
                })
            }
            ClassKind::Primitive => {
                return Err(CoreError::NotInstantiable {
                    class: c.name.clone(),
                    reason: "primitive types have no instances".to_string(),
                })
            }
            ClassKind::Concrete | ClassKind::Final => {}
        }

        let fields = c.fields.iter().map(|f| f.initial.clone()).collect();
        let mut object = Object::new(self.clone(), class, fields);

        match &c.constructor {
            Some(ctor) => {
                let sig = MethodSignature::new(c.name.clone(), ctor.params.iter().copied(), ValueKind::Void);
                if !sig.accepts_args(args) {
                    return Err(CoreError::ArgumentMismatch {
                        method: sig.to_string(),
                        expected: ctor
                            .params
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                        got: args
                            .iter()
                            .map(|a| a.type_name())
                            .collect::<Vec<_>>()
                            .join(", "),
                    });
                }
                (ctor.body)(&mut object, args)?;
            }
            None if !args.is_empty() => {
                return Err(CoreError::ArgumentMismatch {
                    method: format!("{}()", c.name),
                    expected: String::new(),
                    got: args
                        .iter()
                        .map(|a| a.type_name())
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
            None => {}
        }
        Ok(object)
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field(
                "classes",
                &self
                    .inner
                    .classes
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for ClassRegistry
pub struct ClassRegistryBuilder {
    classes: Vec<Class>,
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistryBuilder {
    /// Create a builder preloaded with the well-known classes
    pub fn new() -> Self {
        let mut builder = Self {
            classes: Vec::new(),
            name_to_id: FxHashMap::default(),
        };
        builder.register_well_known();
        builder
    }

    /// Register a class, validating it against the classes already defined
    pub fn define(&mut self, def: ClassDef) -> CoreResult<ClassId> {
        self.validate(&def)?;
        Ok(self.insert(def))
    }

    /// Get class by ID (useful while building)
    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id.index())
    }

    /// Look up a class id by name
    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.name_to_id.get(name).copied()
    }

    /// Freeze into a shared registry
    pub fn build(self) -> ClassRegistry {
        ClassRegistry {
            inner: Arc::new(RegistryInner {
                classes: self.classes,
                name_to_id: self.name_to_id,
            }),
        }
    }

    fn invalid(def: &ClassDef, reason: impl Into<String>) -> CoreError {
        CoreError::InvalidHierarchy {
            class: def.name.clone(),
            reason: reason.into(),
        }
    }

    fn validate(&self, def: &ClassDef) -> CoreResult<()> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(CoreError::DuplicateClass(def.name.clone()));
        }

        let parent_id = def.parent.unwrap_or(ClassId::OBJECT);
        let parent = self
            .class(parent_id)
            .ok_or_else(|| CoreError::UnknownClass(parent_id.to_string()))?;
        if !parent.kind.is_extensible() {
            return Err(Self::invalid(
                def,
                format!("cannot extend {} class {}", kind_name(parent.kind), parent.name),
            ));
        }

        let mut field_names: FxHashSet<&str> =
            parent.fields.iter().map(|f| f.name.as_str()).collect();
        for field in &def.fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(CoreError::DuplicateField {
                    class: def.name.clone(),
                    field: field.name.clone(),
                });
            }
            field.kind.check(&field.initial)?;
            if field.kind == ValueKind::Void {
                return Err(Self::invalid(def, format!("field {} cannot be void", field.name)));
            }
        }

        for (i, (sig, _, body)) in def.methods.iter().enumerate() {
            if sig.params.contains(&ValueKind::Void) {
                return Err(Self::invalid(def, format!("method {} has a void parameter", sig)));
            }
            if def.methods[..i].iter().any(|(other, _, _)| other.matches(sig)) {
                return Err(Self::invalid(def, format!("method {} is declared twice", sig)));
            }
            if let Some(inherited) = self.resolve(parent_id, sig) {
                if !inherited.overridable {
                    return Err(Self::invalid(
                        def,
                        format!("cannot override final method {}", sig),
                    ));
                }
            }
            if body.is_none() && def.kind != ClassKind::Abstract {
                return Err(Self::invalid(
                    def,
                    format!("abstract method {} in a non-abstract class", sig),
                ));
            }
        }

        if def.kind != ClassKind::Abstract {
            for sig in self.abstract_signatures(parent_id) {
                let implemented = def
                    .methods
                    .iter()
                    .any(|(own, _, body)| own.matches(&sig) && body.is_some());
                if !implemented {
                    return Err(Self::invalid(
                        def,
                        format!("abstract method {} is not implemented", sig),
                    ));
                }
            }
        }
        Ok(())
    }

    fn resolve(&self, class: ClassId, sig: &MethodSignature) -> Option<&Arc<Method>> {
        let class = self.class(class)?;
        class
            .ancestors
            .iter()
            .filter_map(|id| self.class(*id))
            .find_map(|c| c.declared_method(sig))
    }

    /// Signatures still abstract as seen from `class`
    fn abstract_signatures(&self, class: ClassId) -> Vec<MethodSignature> {
        let Some(c) = self.class(class) else {
            return Vec::new();
        };
        let mut result: Vec<MethodSignature> = Vec::new();
        for ancestor in c.ancestors.iter().filter_map(|id| self.class(*id)) {
            for m in &ancestor.methods {
                if m.is_abstract() {
                    let resolved = self.resolve(class, &m.signature);
                    if resolved.map(|r| r.is_abstract()).unwrap_or(true)
                        && !result.iter().any(|s| s.matches(&m.signature))
                    {
                        result.push(m.signature.clone());
                    }
                }
            }
        }
        result
    }

    fn insert(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);

        let parent = match def.kind {
            ClassKind::Primitive => None,
            _ if id == ClassId::OBJECT => None,
            _ => Some(def.parent.unwrap_or(ClassId::OBJECT)),
        };

        let mut ancestors = vec![id];
        let mut fields = Vec::new();
        if let Some(parent_id) = parent {
            let parent = &self.classes[parent_id.index()];
            ancestors.extend_from_slice(&parent.ancestors);
            fields.extend(parent.fields.iter().cloned());
        }
        fields.extend(def.fields);

        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();

        let methods = def
            .methods
            .into_iter()
            .map(|(sig, overridable, body)| Arc::new(Method::new(sig, id, overridable, body)))
            .collect();

        self.name_to_id.insert(def.name.clone(), id);
        self.classes.push(Class {
            id,
            name: def.name,
            kind: def.kind,
            parent,
            ancestors,
            fields,
            field_indices,
            methods,
            constructor: def.constructor,
        });
        id
    }

    fn register_well_known(&mut self) {
        let object = self.insert(ClassDef::new("Object").method(
            MethodSignature::new("toString", [], ValueKind::Str),
            |this, _| Ok(Value::str(this.class_name())),
        ));
        debug_assert_eq!(object, ClassId::OBJECT);

        let number = self.insert(
            ClassDef::new("Number")
                .abstract_class()
                .abstract_method(MethodSignature::new("intValue", [], ValueKind::Int))
                .abstract_method(MethodSignature::new("longValue", [], ValueKind::Long))
                .abstract_method(MethodSignature::new("floatValue", [], ValueKind::Float))
                .abstract_method(MethodSignature::new("doubleValue", [], ValueKind::Double))
                .method(MethodSignature::new("shortValue", [], ValueKind::Short), |this, _| {
                    let v = this.invoke("intValue", &[])?;
                    Ok(Value::Short(v.as_i32().unwrap_or_default() as i16))
                })
                .method(MethodSignature::new("byteValue", [], ValueKind::Byte), |this, _| {
                    let v = this.invoke("intValue", &[])?;
                    Ok(Value::Byte(v.as_i32().unwrap_or_default() as i8))
                }),
        );
        debug_assert_eq!(number, ClassId::NUMBER);

        let integer = self.insert(
            ClassDef::new("Integer")
                .extends(ClassId::NUMBER)
                .final_class()
                .field("value", ValueKind::Int)
                .constructor([ValueKind::Int], |this, args| this.set("value", args[0].clone()))
                .method(MethodSignature::new("intValue", [], ValueKind::Int), |this, _| {
                    Ok(this.get("value")?.clone())
                })
                .method(MethodSignature::new("longValue", [], ValueKind::Long), |this, _| {
                    Ok(Value::Long(this.get_as::<i64>("value")?))
                })
                .method(MethodSignature::new("floatValue", [], ValueKind::Float), |this, _| {
                    Ok(Value::Float(this.get_as::<i32>("value")? as f32))
                })
                .method(MethodSignature::new("doubleValue", [], ValueKind::Double), |this, _| {
                    Ok(Value::Double(this.get_as::<i32>("value")? as f64))
                })
                .method(MethodSignature::new("toString", [], ValueKind::Str), |this, _| {
                    Ok(Value::str(this.get_as::<i32>("value")?.to_string()))
                }),
        );
        debug_assert_eq!(integer, ClassId::INTEGER);

        let boolean = self.insert(
            ClassDef::new("Boolean")
                .final_class()
                .field("value", ValueKind::Bool)
                .constructor([ValueKind::Bool], |this, args| this.set("value", args[0].clone()))
                .method(MethodSignature::new("booleanValue", [], ValueKind::Bool), |this, _| {
                    Ok(this.get("value")?.clone())
                }),
        );
        debug_assert_eq!(boolean, ClassId::BOOLEAN);

        let string = self.insert(
            ClassDef::new("String")
                .final_class()
                .field_init("value", ValueKind::Str, "")
                .constructor([ValueKind::Str], |this, args| this.set("value", args[0].clone()))
                .method(MethodSignature::new("length", [], ValueKind::Int), |this, _| {
                    let s: String = this.get_as("value")?;
                    Ok(Value::i32(s.chars().count() as i32))
                })
                .method(MethodSignature::new("isEmpty", [], ValueKind::Bool), |this, _| {
                    let s: String = this.get_as("value")?;
                    Ok(Value::bool(s.is_empty()))
                })
                .method(MethodSignature::new("toString", [], ValueKind::Str), |this, _| {
                    Ok(this.get("value")?.clone())
                }),
        );
        debug_assert_eq!(string, ClassId::STRING);

        let int = self.insert(ClassDef::new("int").primitive());
        debug_assert_eq!(int, ClassId::INT);
        let bool_ = self.insert(ClassDef::new("boolean").primitive());
        debug_assert_eq!(bool_, ClassId::BOOL);
    }
}

impl Default for ClassRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_name(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Concrete => "concrete",
        ClassKind::Abstract => "abstract",
        ClassKind::Final => "final",
        ClassKind::Primitive => "primitive",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_def() -> ClassDef {
        ClassDef::new("Counter")
            .field_init("count", ValueKind::Int, 0)
            .method(MethodSignature::new("inc", [], ValueKind::Void), |this, _| {
                let n: i32 = this.get_as("count")?;
                this.set("count", n + 1)?;
                Ok(Value::Void)
            })
    }

    #[test]
    fn test_standard_registry() {
        let registry = ClassRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.name_of(ClassId::INTEGER), "Integer");
        assert_eq!(registry.class_by_name("Number").map(|c| c.id), Some(ClassId::NUMBER));
        assert_eq!(registry.class(ClassId::INT).map(|c| c.kind), Some(ClassKind::Primitive));
    }

    #[test]
    fn test_subclass_relation() {
        let registry = ClassRegistry::standard();
        assert!(registry.is_subclass_of(ClassId::INTEGER, ClassId::INTEGER));
        assert!(registry.is_subclass_of(ClassId::INTEGER, ClassId::NUMBER));
        assert!(registry.is_subclass_of(ClassId::INTEGER, ClassId::OBJECT));
        assert!(!registry.is_subclass_of(ClassId::NUMBER, ClassId::INTEGER));
        assert!(!registry.is_subclass_of(ClassId::INT, ClassId::OBJECT));
    }

    #[test]
    fn test_define_and_instantiate() {
        let mut builder = ClassRegistry::builder();
        let counter = builder.define(counter_def()).unwrap();
        let registry = builder.build();

        let mut obj = registry.instantiate(counter, &[]).unwrap();
        obj.invoke("inc", &[]).unwrap();
        obj.invoke("inc", &[]).unwrap();
        assert_eq!(obj.get_as::<i32>("count").unwrap(), 2);
        assert!(obj.is_instance_of(ClassId::OBJECT));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut builder = ClassRegistry::builder();
        builder.define(counter_def()).unwrap();
        assert_eq!(
            builder.define(counter_def()).unwrap_err(),
            CoreError::DuplicateClass("Counter".to_string())
        );
    }

    #[test]
    fn test_cannot_extend_final() {
        let mut builder = ClassRegistry::builder();
        let err = builder
            .define(ClassDef::new("MyInt").extends(ClassId::INTEGER))
            .unwrap_err();
        assert!(err.to_string().contains("cannot extend final class Integer"));
    }

    #[test]
    fn test_cannot_override_final_method() {
        let mut builder = ClassRegistry::builder();
        let base = builder
            .define(ClassDef::new("Base").final_method(
                MethodSignature::new("id", [], ValueKind::Int),
                |_, _| Ok(Value::i32(1)),
            ))
            .unwrap();
        let err = builder
            .define(ClassDef::new("Derived").extends(base).method(
                MethodSignature::new("id", [], ValueKind::Int),
                |_, _| Ok(Value::i32(2)),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("cannot override final method id()"));
    }

    #[test]
    fn test_unimplemented_abstract_rejected() {
        let mut builder = ClassRegistry::builder();
        let err = builder
            .define(ClassDef::new("Half").extends(ClassId::NUMBER).method(
                MethodSignature::new("intValue", [], ValueKind::Int),
                |_, _| Ok(Value::i32(0)),
            ))
            .unwrap_err();
        assert!(err.to_string().contains("is not implemented"));
    }

    #[test]
    fn test_duplicate_inherited_field_rejected() {
        let mut builder = ClassRegistry::builder();
        let counter = builder.define(counter_def()).unwrap();
        let err = builder
            .define(
                ClassDef::new("Sub")
                    .extends(counter)
                    .field("count", ValueKind::Int),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateField { .. }));
    }

    #[test]
    fn test_override_resolution() {
        let mut builder = ClassRegistry::builder();
        let counter = builder.define(counter_def()).unwrap();
        let double = builder
            .define(ClassDef::new("DoubleCounter").extends(counter).method(
                MethodSignature::new("inc", [], ValueKind::Void),
                |this, _| {
                    let n: i32 = this.get_as("count")?;
                    this.set("count", n + 2)?;
                    Ok(Value::Void)
                },
            ))
            .unwrap();
        let registry = builder.build();

        let sig = MethodSignature::new("inc", [], ValueKind::Void);
        assert_eq!(registry.resolve(counter, &sig).unwrap().declaring, counter);
        assert_eq!(registry.resolve(double, &sig).unwrap().declaring, double);

        let mut obj = registry.instantiate(double, &[]).unwrap();
        obj.invoke_signature(&sig, &[]).unwrap();
        assert_eq!(obj.get_as::<i32>("count").unwrap(), 2);
    }

    #[test]
    fn test_allocate_skips_constructor() {
        let mut builder = ClassRegistry::builder();
        let noisy = builder
            .define(
                ClassDef::new("Noisy")
                    .field_init("label", ValueKind::Str, "initialized")
                    .constructor([ValueKind::Int], |_, _| {
                        Err(CoreError::RuntimeError("constructor must not run".to_string()))
                    }),
            )
            .unwrap();
        let registry = builder.build();

        let obj = registry.allocate(noisy).unwrap();
        assert_eq!(obj.get("label").unwrap(), &Value::Null);
        assert!(registry.instantiate(noisy, &[Value::i32(1)]).is_err());
    }

    #[test]
    fn test_abstract_and_primitive_not_instantiable() {
        let registry = ClassRegistry::standard();
        assert!(matches!(
            registry.instantiate(ClassId::NUMBER, &[]),
            Err(CoreError::NotInstantiable { .. })
        ));
        assert!(registry.allocate(ClassId::NUMBER).is_ok());
        assert!(registry.allocate(ClassId::BOOL).is_err());
    }

    #[test]
    fn test_integer_builtin() {
        let registry = ClassRegistry::standard();
        let mut three = registry.instantiate(ClassId::INTEGER, &[Value::i32(3)]).unwrap();
        assert_eq!(three.invoke("intValue", &[]).unwrap(), Value::i32(3));
        assert_eq!(three.invoke("doubleValue", &[]).unwrap(), Value::f64(3.0));
        assert_eq!(three.invoke("byteValue", &[]).unwrap(), Value::Byte(3));
        assert_eq!(three.invoke("toString", &[]).unwrap(), Value::str("3"));
    }

    #[test]
    fn test_constructor_arity_checked() {
        let registry = ClassRegistry::standard();
        let err = registry.instantiate(ClassId::INTEGER, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Method Integer(int) expects (int), got ()");
    }

    #[test]
    fn test_visible_methods_dedup_overrides() {
        let registry = ClassRegistry::standard();
        let methods = registry.visible_methods(ClassId::INTEGER);
        let to_string: Vec<_> = methods
            .iter()
            .filter(|m| m.signature.name == "toString")
            .collect();
        assert_eq!(to_string.len(), 1);
        assert_eq!(to_string[0].declaring, ClassId::INTEGER);
    }
}
