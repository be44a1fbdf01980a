//! Functo Engine
//!
//! Turns an ordinary method call into a reusable functional value:
//! - Stand-ins record the call they receive instead of running it
//! - A per-session capture slot holds at most one recorded call
//! - Modes validate the captured method against a functional shape
//! - Functional values re-dispatch the recorded call against any target
//!
//! # Example
//!
//! ```text
//! let session = CaptureSession::new();
//! let number = session.stand_in(&registry, ClassId::NUMBER)?;
//! let int_value = session.function_for(number.call("intValue", &[])?)?;
//! let mut three = registry.instantiate(ClassId::INTEGER, &[Value::i32(3)])?;
//! assert_eq!(int_value.apply(&mut three)?, Value::i32(3));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod adapters;
pub mod capture;
pub mod error;
pub mod functor;
pub mod mode;
pub mod options;
pub mod shape;

pub use adapters::{Command, Filter, Function, Predicate, Runnable};
pub use capture::ambient::{
    calls_to, capture_phase, command_for, configure, consume_capture, discard_capture,
    filter_for, function_for, predicate_for, predicate_for_or, prepare_void, runnable_for,
    void_command, void_command_as, with_session,
};
pub use capture::{CaptureRecord, CaptureSession, CaptureSlot, SlotPhase, StandIn};
pub use error::{FunctoError, FunctoResult, ProtocolViolation};
pub use functor::{synthesize, FunctionalValue};
pub use mode::{Mode, NullPolicy, ReturnValidation};
pub use options::SessionOptions;
pub use shape::{FunctionalShape, ShapeReturn};

pub use functo_core;
