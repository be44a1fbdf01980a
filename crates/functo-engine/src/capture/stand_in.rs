//! Stand-in generator
//!
//! A [`StandIn`] is an observation-only instance of a class. Its storage is
//! allocated without running field initializers or the constructor, so a
//! class whose constructor has side effects or needs arguments can still be
//! stood in for.

use std::cell::RefCell;
use std::fmt;

use functo_core::{ClassId, ClassKind, ClassRegistry, Object, Value};

use super::interceptor;
use super::session::CaptureSession;
use crate::error::{FunctoError, FunctoResult};

/// Stand-in for one class, bound to the session that created it
pub struct StandIn {
    class: ClassId,
    registry: ClassRegistry,
    storage: RefCell<Object>,
    session: CaptureSession,
}

impl StandIn {
    pub(crate) fn generate(
        session: CaptureSession,
        registry: &ClassRegistry,
        class: ClassId,
    ) -> FunctoResult<Self> {
        let descriptor = registry.require(class)?;
        let reason = match descriptor.kind {
            ClassKind::Final => Some("final classes cannot be subclassed"),
            ClassKind::Primitive => Some("primitive types cannot be subclassed"),
            ClassKind::Concrete | ClassKind::Abstract => None,
        };
        if let Some(reason) = reason {
            return Err(FunctoError::UnsupportedTargetKind {
                class: descriptor.name.clone(),
                reason: reason.to_string(),
            });
        }

        let storage = registry.allocate(class)?;
        tracing::debug!(class = %descriptor.name, "created stand-in");
        Ok(Self {
            class,
            registry: registry.clone(),
            storage: RefCell::new(storage),
            session,
        })
    }

    /// Class this stands in for
    pub fn class_id(&self) -> ClassId {
        self.class
    }

    /// Name of the class this stands in for
    pub fn class_name(&self) -> &str {
        self.registry.name_of(self.class)
    }

    /// Registry the class lives in
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub(crate) fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Call a method by name
    ///
    /// Overridable methods are captured and answer a placeholder; final
    /// methods run against the stand-in's own storage.
    pub fn call(&self, name: &str, args: &[Value]) -> FunctoResult<Value> {
        let method = self
            .registry
            .find_method(self.class, name, args)
            .cloned()
            .ok_or_else(|| FunctoError::MethodNotApplicable {
                method: describe_call(name, args),
                class: self.class_name().to_string(),
            })?;

        if method.overridable {
            interceptor::intercept(
                self.session.slot(),
                &self.registry,
                self.class,
                &method,
                args,
            )
        } else {
            Ok(self.storage.borrow_mut().invoke_method(&method, args)?)
        }
    }

    /// Read a field of the stand-in's storage
    pub fn get(&self, field: &str) -> FunctoResult<Value> {
        Ok(self.storage.borrow().get(field)?.clone())
    }

    /// Write a field of the stand-in's storage
    pub fn set(&self, field: &str, value: impl Into<Value>) -> FunctoResult<()> {
        self.storage
            .borrow_mut()
            .set(field, value)
            .map_err(FunctoError::from)
    }
}

fn describe_call(name: &str, args: &[Value]) -> String {
    let kinds: Vec<&str> = args.iter().map(Value::type_name).collect();
    format!("{}({})", name, kinds.join(", "))
}

impl fmt::Debug for StandIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandIn")
            .field("class", &self.class_name())
            .finish_non_exhaustive()
    }
}

