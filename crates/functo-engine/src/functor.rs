//! Functor synthesis and application
//!
//! Synthesis turns a consumed [`CaptureRecord`] into a [`FunctionalValue`].
//! Two checks happen at two different times:
//!
//! - at synthesis, the requested static type must be the declaring type or
//!   a supertype of it ([`FunctoError::DeclaringTypeMismatch`]);
//! - at application, the target's runtime class must expose the recorded
//!   signature ([`FunctoError::MethodNotApplicable`]).

use std::sync::Arc;

use functo_core::{ClassId, Object, Value};
use parking_lot::Mutex;

use crate::adapters::Runnable;
use crate::capture::CaptureRecord;
use crate::error::{FunctoError, FunctoResult};
use crate::mode::Mode;
use crate::shape::FunctionalShape;

/// Synthesis-time validation of a pending record
pub(crate) fn check(
    record: &CaptureRecord,
    mode: &Mode,
    shape: FunctionalShape,
    requested: Option<ClassId>,
) -> FunctoResult<()> {
    if let Some(requested) = requested {
        let registry = record.registry();
        if !registry.is_subclass_of(record.declaring_type(), requested) {
            return Err(FunctoError::DeclaringTypeMismatch {
                shape,
                method: record.method(),
                declaring: record.declaring_name().to_string(),
                requested: registry.name_of(requested).to_string(),
            });
        }
    }
    mode.validate(record, shape)
}

/// Validate `record` and wrap it into a functional value
pub fn synthesize(
    record: CaptureRecord,
    mode: Mode,
    shape: FunctionalShape,
    requested: Option<ClassId>,
) -> FunctoResult<FunctionalValue> {
    check(&record, &mode, shape, requested)?;
    Ok(FunctionalValue::new(record, mode, shape))
}

/// A captured method call, reusable against any number of targets
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct FunctionalValue {
    record: Arc<CaptureRecord>,
    mode: Mode,
    shape: FunctionalShape,
}

impl FunctionalValue {
    pub(crate) fn new(record: CaptureRecord, mode: Mode, shape: FunctionalShape) -> Self {
        tracing::debug!(
            %shape,
            method = %record.signature(),
            declaring = record.declaring_name(),
            "synthesized functor"
        );
        Self {
            record: Arc::new(record),
            mode,
            shape,
        }
    }

    /// Call the recorded method on `target`
    ///
    /// The signature is resolved against the target's runtime class, not
    /// the class it was captured on.
    pub fn apply(&self, target: &mut Object) -> FunctoResult<Value> {
        let signature = self.record.signature();
        let method = target
            .registry()
            .resolve(target.class_id(), signature)
            .cloned()
            .ok_or_else(|| FunctoError::MethodNotApplicable {
                method: signature.to_string(),
                class: target.class_name().to_string(),
            })?;
        let raw = target.invoke_method(&method, self.record.arguments())?;
        self.mode.coerce(&self.record, raw)
    }

    /// Like [`apply`](Self::apply), with `None` handled by the mode's
    /// safe-navigation setting
    pub fn apply_nullable(&self, target: Option<&mut Object>) -> FunctoResult<Value> {
        match target {
            Some(target) => self.apply(target),
            None => self.mode.null_target(&self.record),
        }
    }

    /// Bind to a target, producing a zero-argument command
    pub fn bind(&self, target: Arc<Mutex<Object>>) -> Runnable {
        Runnable::new(self.clone(), target)
    }

    /// Captured call
    pub fn record(&self) -> &CaptureRecord {
        &self.record
    }

    /// Mode bound at synthesis
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Shape this value was synthesized as
    pub fn shape(&self) -> FunctionalShape {
        self.shape
    }
}
