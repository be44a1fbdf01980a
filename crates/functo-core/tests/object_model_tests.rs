//! Integration tests for the object model
//!
//! Tests cover:
//! - Class definition with inheritance and overrides
//! - Object creation, field access and kind-checked writes
//! - Dispatch by signature against the runtime class
//! - Return kind enforcement

use functo_core::{
    ClassDef, ClassId, ClassRegistry, CoreError, MethodSignature, Value, ValueKind,
};

fn shapes() -> (ClassRegistry, ClassId, ClassId) {
    let mut builder = ClassRegistry::builder();
    let shape = builder
        .define(
            ClassDef::new("Shape")
                .abstract_class()
                .field_init("name", ValueKind::Str, "shape")
                .abstract_method(MethodSignature::new("area", [], ValueKind::Double))
                .method(MethodSignature::new("isLarge", [], ValueKind::Bool), |this, _| {
                    let area = this.invoke("area", &[])?;
                    Ok(Value::bool(area.as_f64().unwrap_or_default() > 100.0))
                }),
        )
        .unwrap();
    let square = builder
        .define(
            ClassDef::new("Square")
                .extends(shape)
                .field("side", ValueKind::Double)
                .constructor([ValueKind::Double], |this, args| {
                    this.set("side", args[0].clone())?;
                    this.set("name", "square")
                })
                .method(MethodSignature::new("area", [], ValueKind::Double), |this, _| {
                    let side: f64 = this.get_as("side")?;
                    Ok(Value::f64(side * side))
                }),
        )
        .unwrap();
    (builder.build(), shape, square)
}

#[test]
fn test_object_creation_and_field_access() {
    let (registry, _, square) = shapes();
    let obj = registry.instantiate(square, &[Value::f64(3.0)]).unwrap();

    assert_eq!(obj.class_name(), "Square");
    assert_eq!(obj.field_count(), 2);
    assert_eq!(obj.get("name").unwrap(), &Value::str("square"));
    assert_eq!(obj.get_as::<f64>("side").unwrap(), 3.0);
}

#[test]
fn test_field_writes_are_kind_checked() {
    let (registry, _, square) = shapes();
    let mut obj = registry.instantiate(square, &[Value::f64(1.0)]).unwrap();

    assert!(matches!(
        obj.set("side", "wide"),
        Err(CoreError::TypeMismatch { .. })
    ));
    assert!(matches!(
        obj.set("depth", 1.0),
        Err(CoreError::FieldNotFound { .. })
    ));
    obj.set("name", Value::Null).unwrap();
}

#[test]
fn test_inherited_method_dispatches_to_override() {
    let (registry, _, square) = shapes();
    let mut small = registry.instantiate(square, &[Value::f64(2.0)]).unwrap();
    let mut large = registry.instantiate(square, &[Value::f64(20.0)]).unwrap();

    assert_eq!(small.invoke("isLarge", &[]).unwrap(), Value::bool(false));
    assert_eq!(large.invoke("isLarge", &[]).unwrap(), Value::bool(true));
}

#[test]
fn test_invoke_signature_uses_runtime_class() {
    let (registry, shape, square) = shapes();
    let area = MethodSignature::new("area", [], ValueKind::Double);

    // Declared abstract on Shape, resolved on Square at runtime
    assert!(registry.resolve(shape, &area).unwrap().is_abstract());
    let mut obj = registry.instantiate(square, &[Value::f64(4.0)]).unwrap();
    assert_eq!(obj.invoke_signature(&area, &[]).unwrap(), Value::f64(16.0));
}

#[test]
fn test_missing_method_names_the_signature() {
    let registry = ClassRegistry::standard();
    let mut three = registry
        .instantiate(ClassId::INTEGER, &[Value::i32(3)])
        .unwrap();
    let sig = MethodSignature::new("inc", [], ValueKind::Void);

    let err = three.invoke_signature(&sig, &[]).unwrap_err();
    assert_eq!(err.to_string(), "Method inc() does not exist on Integer");
}

#[test]
fn test_return_kind_is_enforced() {
    let mut builder = ClassRegistry::builder();
    let liar = builder
        .define(ClassDef::new("Liar").method(
            MethodSignature::new("isReady", [], ValueKind::Bool),
            |_, _| Ok(Value::Null),
        ))
        .unwrap();
    let registry = builder.build();

    let mut obj = registry.instantiate(liar, &[]).unwrap();
    let err = obj.invoke("isReady", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Method isReady() declares boolean but returned null"
    );
}

#[test]
fn test_overloads_selected_by_argument_kind() {
    let mut builder = ClassRegistry::builder();
    let echo = builder
        .define(
            ClassDef::new("Echo")
                .method(
                    MethodSignature::new("say", [ValueKind::Int], ValueKind::Str),
                    |_, args| Ok(Value::str(format!("int {}", args[0]))),
                )
                .method(
                    MethodSignature::new("say", [ValueKind::Str], ValueKind::Str),
                    |_, args| Ok(Value::str(format!("str {}", args[0]))),
                ),
        )
        .unwrap();
    let registry = builder.build();

    let mut obj = registry.instantiate(echo, &[]).unwrap();
    assert_eq!(obj.invoke("say", &[Value::i32(1)]).unwrap(), Value::str("int 1"));
    assert_eq!(obj.invoke("say", &[Value::str("x")]).unwrap(), Value::str("str x"));
    assert!(matches!(
        obj.invoke("say", &[Value::bool(true)]),
        Err(CoreError::MethodNotFound { .. })
    ));
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let (registry, _, square) = shapes();
    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let mut obj = registry.instantiate(square, &[Value::f64(i as f64)]).unwrap();
                obj.invoke("area", &[]).unwrap()
            })
        })
        .collect();

    let areas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        areas,
        vec![Value::f64(1.0), Value::f64(4.0), Value::f64(9.0), Value::f64(16.0)]
    );
}
