//! Explicit capture sessions
//!
//! A [`CaptureSession`] owns one capture slot. Stand-ins created from a
//! session record into that slot, and the session's synthesis methods
//! consume it:
//!
//! ```text
//! let grows = session.stand_in(&registry, grows_class)?;
//! session.prepare_void(&grows)?.call("inc", &[])?;
//! let inc = session.void_command()?;
//! ```
//!
//! Sessions are reference counted handles and are `!Send`: the whole
//! open, intercept, consume sequence happens on one thread.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use functo_core::{ClassId, ClassRegistry, Object, Value};
use parking_lot::Mutex;

use super::slot::{CaptureSlot, SlotPhase};
use super::stand_in::StandIn;
use crate::adapters::{Command, Filter, Function, Predicate, Runnable};
use crate::error::{FunctoError, FunctoResult, ProtocolViolation};
use crate::functor::{self, FunctionalValue};
use crate::mode::Mode;
use crate::options::SessionOptions;
use crate::shape::FunctionalShape;

#[derive(Debug, Default)]
struct SessionState {
    slot: RefCell<CaptureSlot>,
    options: Cell<SessionOptions>,
}

/// Handle to one thread's capture slot
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    state: Rc<SessionState>,
}

impl CaptureSession {
    /// Create a session with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given options
    pub fn with_options(options: SessionOptions) -> Self {
        let session = Self::new();
        session.set_options(options);
        session
    }

    /// Current options
    pub fn options(&self) -> SessionOptions {
        self.state.options.get()
    }

    /// Replace the options
    pub fn set_options(&self, options: SessionOptions) {
        self.state.options.set(options);
    }

    pub(crate) fn slot(&self) -> &RefCell<CaptureSlot> {
        &self.state.slot
    }

    fn owns(&self, stand_in: &StandIn) -> bool {
        Rc::ptr_eq(&self.state, &stand_in.session().state)
    }

    /// Create a stand-in for `class` that records into this session
    pub fn stand_in(&self, registry: &ClassRegistry, class: ClassId) -> FunctoResult<StandIn> {
        StandIn::generate(self.clone(), registry, class)
    }

    /// Open the slot for a void capture on `stand_in`
    ///
    /// The next call made on the returned stand-in fills the slot.
    pub fn prepare_void<'a>(&self, stand_in: &'a StandIn) -> FunctoResult<&'a StandIn> {
        if !self.owns(stand_in) {
            self.discard();
            return Err(FunctoError::ForeignStandIn {
                class: stand_in.class_name().to_string(),
            });
        }
        self.slot().borrow_mut().open(stand_in.class_name())?;
        Ok(stand_in)
    }

    /// Consume the pending capture into a functional value
    ///
    /// A synthesis failure leaves the capture pending so the request can be
    /// retried; a protocol failure empties the slot.
    ///
    /// A capture left pending by a failed request that is never retried
    /// makes the next call on any stand-in of this session fail with
    /// [`ProtocolViolation::UnconsumedCapture`]. That failure empties the
    /// slot, so the call after it captures normally. Call
    /// [`discard`](Self::discard) to drop the pending capture instead of
    /// retrying.
    pub fn consume(
        &self,
        mode: Mode,
        shape: FunctionalShape,
        requested: Option<ClassId>,
    ) -> FunctoResult<FunctionalValue> {
        self.consume_checked(mode, shape, requested, false)
    }

    fn consume_checked(
        &self,
        mode: Mode,
        shape: FunctionalShape,
        requested: Option<ClassId>,
        require_prepared: bool,
    ) -> FunctoResult<FunctionalValue> {
        let mut slot = self.slot().borrow_mut();
        slot.ensure_filled()?;
        if require_prepared && !slot.was_prepared() {
            let method = slot.peek()?.method();
            slot.reset();
            return Err(ProtocolViolation::UnpreparedVoid { method }.into());
        }
        functor::check(slot.peek()?, &mode, shape, requested)?;
        let record = slot.consume()?;
        Ok(FunctionalValue::new(record, mode, shape))
    }

    /// Function from the call whose placeholder result is `chained`
    pub fn function_for(&self, _chained: Value) -> FunctoResult<Function> {
        self.consume(Mode::function(), FunctionalShape::UnaryFunction, None)
            .map(Function::new)
    }

    /// Function with an explicit mode
    pub fn function_with(&self, _chained: Value, mode: Mode) -> FunctoResult<Function> {
        self.consume(mode, FunctionalShape::UnaryFunction, None)
            .map(Function::new)
    }

    /// Predicate from a boolean-returning call
    pub fn predicate_for(&self, _chained: Value) -> FunctoResult<Predicate> {
        self.consume(Mode::predicate(), FunctionalShape::Predicate, None)
            .map(Predicate::new)
    }

    /// Predicate that answers `default` when the method returns null
    pub fn predicate_for_or(&self, _chained: Value, default: bool) -> FunctoResult<Predicate> {
        self.consume(Mode::predicate_or(default), FunctionalShape::Predicate, None)
            .map(Predicate::new)
    }

    /// Filter from a boolean-returning call
    pub fn filter_for(&self, _chained: Value) -> FunctoResult<Filter> {
        self.consume(Mode::filter(), FunctionalShape::Filter, None)
            .map(Filter::new)
    }

    /// Command from a value-returning call; the value is discarded
    pub fn command_for(&self, _chained: Value) -> FunctoResult<Command> {
        self.consume(Mode::command(), FunctionalShape::VoidCommand, None)
            .map(Command::new)
    }

    /// Command from the call made after [`prepare_void`](Self::prepare_void)
    pub fn void_command(&self) -> FunctoResult<Command> {
        self.void_command_checked(None)
    }

    /// Like [`void_command`](Self::void_command), typed to `requested`,
    /// which must be the captured class or one of its supertypes
    pub fn void_command_as(&self, requested: ClassId) -> FunctoResult<Command> {
        self.void_command_checked(Some(requested))
    }

    fn void_command_checked(&self, requested: Option<ClassId>) -> FunctoResult<Command> {
        let strict = !self.options().allow_unprepared_void;
        self.consume_checked(
            Mode::command(),
            FunctionalShape::VoidCommand,
            requested,
            strict,
        )
        .map(Command::new)
    }

    /// Zero-argument command bound to `target`
    pub fn runnable_for(
        &self,
        target: Arc<Mutex<Object>>,
        _chained: Value,
    ) -> FunctoResult<Runnable> {
        let functor = self.consume(Mode::runnable(), FunctionalShape::ZeroArgCommand, None)?;
        Ok(functor.bind(target))
    }

    /// Phase of the slot
    pub fn phase(&self) -> SlotPhase {
        self.slot().borrow().phase()
    }

    /// Drop any pending capture, returning the phase it was in
    pub fn discard(&self) -> SlotPhase {
        self.slot().borrow_mut().reset()
    }
}
