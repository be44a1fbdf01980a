//! Thread-scoped capture facade
//!
//! Free functions over one [`CaptureSession`] per thread, for call sites
//! that cannot thread a session handle through:
//!
//! ```text
//! let grows = calls_to(&registry, grows_class)?;
//! prepare_void(&grows)?.call("inc", &[])?;
//! let inc = void_command()?;
//! ```
//!
//! Sessions on different threads never see each other's captures.

use std::sync::Arc;

use functo_core::{ClassId, ClassRegistry, Object, Value};
use parking_lot::Mutex;

use super::session::CaptureSession;
use super::slot::SlotPhase;
use super::stand_in::StandIn;
use crate::adapters::{Command, Filter, Function, Predicate, Runnable};
use crate::error::FunctoResult;
use crate::functor::FunctionalValue;
use crate::mode::Mode;
use crate::options::SessionOptions;
use crate::shape::FunctionalShape;

thread_local! {
    static SESSION: CaptureSession = CaptureSession::new();
}

/// Run `f` with this thread's session
pub fn with_session<R>(f: impl FnOnce(&CaptureSession) -> R) -> R {
    SESSION.with(f)
}

/// Replace this thread's session options
pub fn configure(options: SessionOptions) {
    with_session(|s| s.set_options(options))
}

/// Stand-in for `class` recording into this thread's session
pub fn calls_to(registry: &ClassRegistry, class: ClassId) -> FunctoResult<StandIn> {
    with_session(|s| s.stand_in(registry, class))
}

/// Open this thread's slot for a void capture
pub fn prepare_void(stand_in: &StandIn) -> FunctoResult<&StandIn> {
    with_session(|s| s.prepare_void(stand_in))
}

/// Consume this thread's pending capture
pub fn consume_capture(
    mode: Mode,
    shape: FunctionalShape,
    requested: Option<ClassId>,
) -> FunctoResult<FunctionalValue> {
    with_session(|s| s.consume(mode, shape, requested))
}

/// See [`CaptureSession::function_for`]
pub fn function_for(chained: Value) -> FunctoResult<Function> {
    with_session(|s| s.function_for(chained))
}

/// See [`CaptureSession::predicate_for`]
pub fn predicate_for(chained: Value) -> FunctoResult<Predicate> {
    with_session(|s| s.predicate_for(chained))
}

/// See [`CaptureSession::predicate_for_or`]
pub fn predicate_for_or(chained: Value, default: bool) -> FunctoResult<Predicate> {
    with_session(|s| s.predicate_for_or(chained, default))
}

/// See [`CaptureSession::filter_for`]
pub fn filter_for(chained: Value) -> FunctoResult<Filter> {
    with_session(|s| s.filter_for(chained))
}

/// See [`CaptureSession::command_for`]
pub fn command_for(chained: Value) -> FunctoResult<Command> {
    with_session(|s| s.command_for(chained))
}

/// See [`CaptureSession::void_command`]
pub fn void_command() -> FunctoResult<Command> {
    with_session(|s| s.void_command())
}

/// See [`CaptureSession::void_command_as`]
pub fn void_command_as(requested: ClassId) -> FunctoResult<Command> {
    with_session(|s| s.void_command_as(requested))
}

/// See [`CaptureSession::runnable_for`]
pub fn runnable_for(target: Arc<Mutex<Object>>, chained: Value) -> FunctoResult<Runnable> {
    with_session(|s| s.runnable_for(target, chained))
}

/// Drop this thread's pending capture
pub fn discard_capture() -> SlotPhase {
    with_session(|s| s.discard())
}

/// Phase of this thread's slot
pub fn capture_phase() -> SlotPhase {
    with_session(|s| s.phase())
}
