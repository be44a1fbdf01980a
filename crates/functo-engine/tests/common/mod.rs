//! Classes shared by the engine integration tests

#![allow(dead_code)]

use functo_core::{
    ClassDef, ClassId, ClassRegistry, CoreError, MethodSignature, Object, Value, ValueKind,
};

/// Registry with the fixture classes and their ids
pub struct Fixtures {
    pub registry: ClassRegistry,
    pub grows: ClassId,
    pub grows2: ClassId,
    pub generic: ClassId,
    pub inc_list: ClassId,
    pub person: ClassId,
}

impl Fixtures {
    pub fn new() -> Self {
        let mut builder = ClassRegistry::builder();

        let grows = builder
            .define(
                ClassDef::new("Grows")
                    .field("i", ValueKind::Int)
                    .method(
                        MethodSignature::new("incAndReturn", [], ValueKind::Str),
                        |this, _| {
                            let i = bump(this, 1)?;
                            Ok(Value::str(i.to_string()))
                        },
                    )
                    .method(MethodSignature::new("inc", [], ValueKind::Void), |this, _| {
                        bump(this, 1)?;
                        Ok(Value::Void)
                    })
                    .method(MethodSignature::new("dec", [], ValueKind::Void), |this, _| {
                        bump(this, -1)?;
                        Ok(Value::Void)
                    }),
            )
            .unwrap();

        let grows2 = builder.define(ClassDef::new("Grows2").extends(grows)).unwrap();

        let generic = builder
            .define(
                ClassDef::new("Generic")
                    .field("number", ValueKind::Double)
                    .constructor([ValueKind::Double], |this, args| {
                        this.set("number", args[0].clone())
                    })
                    .method(
                        MethodSignature::new("incAndGet", [], ValueKind::Double),
                        |this, _| {
                            let n = this.get_as::<f64>("number")? + 1.0;
                            this.set("number", n)?;
                            Ok(Value::f64(n))
                        },
                    )
                    .method(MethodSignature::new("voidInc", [], ValueKind::Void), |this, _| {
                        let n = this.get_as::<f64>("number")? + 1.0;
                        this.set("number", n)?;
                        Ok(Value::Void)
                    }),
            )
            .unwrap();

        let inc_list = builder
            .define(
                ClassDef::new("IncList")
                    .field_init("items", ValueKind::List, Value::list(Vec::new()))
                    .method(MethodSignature::new("add", [ValueKind::Int], ValueKind::Bool), |this, args| {
                        items(this)?.push(args[0].clone());
                        Ok(Value::bool(true))
                    })
                    .method(MethodSignature::new("get", [ValueKind::Int], ValueKind::Int), |this, args| {
                        let index = index_arg(&args[0]);
                        let list = this.get("items")?.as_list().unwrap_or_default();
                        list.get(index).cloned().ok_or_else(|| out_of_bounds(index))
                    })
                    .method(
                        MethodSignature::new("incIndex", [ValueKind::Int], ValueKind::Int),
                        |this, args| {
                            let index = index_arg(&args[0]);
                            let slot = items(this)?
                                .get_mut(index)
                                .ok_or_else(|| out_of_bounds(index))?;
                            let next = slot.as_i32().unwrap_or_default() + 1;
                            *slot = Value::i32(next);
                            Ok(Value::i32(next))
                        },
                    ),
            )
            .unwrap();

        let person = builder
            .define(
                ClassDef::new("Person")
                    .field("name", ValueKind::Str)
                    .field("age", ValueKind::Int)
                    .field("active", ValueKind::BoxedBool)
                    .constructor([ValueKind::Str, ValueKind::Int], |this, args| {
                        this.set("name", args[0].clone())?;
                        this.set("age", args[1].clone())
                    })
                    .method(MethodSignature::new("getName", [], ValueKind::Str), |this, _| {
                        Ok(this.get("name")?.clone())
                    })
                    .method(MethodSignature::new("getAge", [], ValueKind::Int), |this, _| {
                        Ok(this.get("age")?.clone())
                    })
                    .method(MethodSignature::new("isAdult", [], ValueKind::Bool), |this, _| {
                        Ok(Value::bool(this.get_as::<i32>("age")? >= 18))
                    })
                    .method(MethodSignature::new("isActive", [], ValueKind::BoxedBool), |this, _| {
                        Ok(this.get("active")?.clone())
                    })
                    .method(
                        MethodSignature::new("olderThan", [ValueKind::Int], ValueKind::Bool),
                        |this, args| {
                            let age = this.get_as::<i32>("age")?;
                            Ok(Value::bool(age > args[0].as_i32().unwrap_or_default()))
                        },
                    ),
            )
            .unwrap();

        Self {
            registry: builder.build(),
            grows,
            grows2,
            generic,
            inc_list,
            person,
        }
    }

    pub fn new_grows(&self) -> Object {
        self.registry.instantiate(self.grows, &[]).unwrap()
    }

    pub fn new_person(&self, name: &str, age: i32) -> Object {
        self.registry
            .instantiate(self.person, &[Value::str(name), Value::i32(age)])
            .unwrap()
    }

    pub fn new_inc_list(&self, values: &[i32]) -> Object {
        let mut list = self.registry.instantiate(self.inc_list, &[]).unwrap();
        for v in values {
            list.invoke("add", &[Value::i32(*v)]).unwrap();
        }
        list
    }
}

fn bump(this: &mut Object, by: i32) -> Result<i32, CoreError> {
    let i = this.get_as::<i32>("i")? + by;
    this.set("i", i)?;
    Ok(i)
}

fn items(this: &mut Object) -> Result<&mut Vec<Value>, CoreError> {
    this.field_mut("items")?
        .as_list_mut()
        .ok_or_else(|| CoreError::RuntimeError("items is not a list".to_string()))
}

fn index_arg(arg: &Value) -> usize {
    arg.as_i32().unwrap_or_default().max(0) as usize
}

fn out_of_bounds(index: usize) -> CoreError {
    CoreError::RuntimeError(format!("index {} out of bounds", index))
}
