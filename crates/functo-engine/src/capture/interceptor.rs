//! Call interceptor
//!
//! Every overridable method of a stand-in lands here instead of running its
//! body. The call is recorded into the session's slot and the caller gets
//! the zero-like placeholder of the declared return kind back.

use std::cell::RefCell;

use functo_core::{ClassId, ClassRegistry, Method, Value};

use super::record::CaptureRecord;
use super::slot::CaptureSlot;
use crate::error::FunctoResult;

/// Record `method` called with `args` on a stand-in of `declaring`
pub(crate) fn intercept(
    slot: &RefCell<CaptureSlot>,
    registry: &ClassRegistry,
    declaring: ClassId,
    method: &Method,
    args: &[Value],
) -> FunctoResult<Value> {
    let record = CaptureRecord::new(
        registry.clone(),
        declaring,
        method.signature.clone(),
        args.to_vec(),
    );
    slot.borrow_mut().fill(record)?;
    Ok(method.signature.ret.placeholder())
}
