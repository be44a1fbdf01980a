//! Error types for capture, synthesis and application

use functo_core::CoreError;

use crate::shape::FunctionalShape;

/// Result type for engine operations
pub type FunctoResult<T> = Result<T, FunctoError>;

/// Every failure the engine reports
///
/// All errors surface synchronously at the call that triggered them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctoError {
    /// Capture steps happened out of order; the slot has been reset
    #[error(transparent)]
    ProtocolOrderViolation(#[from] ProtocolViolation),

    /// Captured method's return kind cannot satisfy the requested shape
    #[error("Failed to create {shape}: method {method} returns {actual}, but a {shape} requires {expected}")]
    IncompatibleReturnKind {
        /// Requested shape
        shape: FunctionalShape,
        /// Captured method
        method: String,
        /// Return kind the shape requires
        expected: String,
        /// Declared return kind of the method
        actual: String,
    },

    /// Mode was built for a different shape than the one requested
    #[error("Failed to create {shape}: a mode for a {mode_shape} cannot produce a {shape}")]
    ModeMismatch {
        /// Requested shape
        shape: FunctionalShape,
        /// Shape the mode targets
        mode_shape: FunctionalShape,
    },

    /// Requested static type is narrower than the captured declaring type
    #[error("Failed to create {shape}: method {method} was captured on {declaring}, which is not {requested} or a subtype of it")]
    DeclaringTypeMismatch {
        /// Requested shape
        shape: FunctionalShape,
        /// Captured method
        method: String,
        /// Class the method was captured on
        declaring: String,
        /// Requested static type
        requested: String,
    },

    /// Runtime class of the target lacks the captured method
    #[error("Method {method} does not exist on {class}")]
    MethodNotApplicable {
        /// Method signature
        method: String,
        /// Runtime class of the target
        class: String,
    },

    /// Stand-ins cannot be derived from this class
    #[error("Cannot create a stand-in for {class}: {reason}")]
    UnsupportedTargetKind {
        /// Class name
        class: String,
        /// Why not
        reason: String,
    },

    /// Null-result default that the shape cannot return
    #[error("Failed to create {shape}: the default for null results is {default}, but a {shape} requires boolean")]
    InvalidNullDefault {
        /// Requested shape
        shape: FunctionalShape,
        /// Type of the configured default
        default: String,
    },

    /// Stand-in belongs to a different capture session
    #[error("Cannot prepare the stand-in for {class}: it belongs to a different capture session")]
    ForeignStandIn {
        /// Class of the stand-in
        class: String,
    },

    /// Method returned null where the mode does not allow it
    #[error("Method {method} returned null, which a {shape} cannot use; supply a default for null results")]
    NullResult {
        /// Shape being applied
        shape: FunctionalShape,
        /// Captured method
        method: String,
    },

    /// Applied to an absent target without safe navigation
    #[error("Cannot apply method {method} to a null target")]
    NullTarget {
        /// Captured method
        method: String,
    },

    /// Failure inside the object model (argument kinds, method bodies, ...)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Detail of a capture protocol violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    /// Slot opened again before the pending capture was consumed
    #[error("Cannot prepare a stand-in for {class}: an earlier capture is still pending. Either no method was called after a \"prepare_void()\", or back-to-back \"prepare_void()\" calls were made without a \"void_command()\" between them")]
    BackToBackPrepare {
        /// Class of the stand-in being prepared
        class: String,
    },

    /// Synthesis requested with nothing captured
    #[error("No call to a method was made on a stand-in before a functor was requested")]
    NoCapture,

    /// Synthesis requested after a prepare that was never followed by a call
    #[error("No call to a method was made on the stand-in for {class} after \"prepare_void()\"")]
    PreparedWithoutCall {
        /// Class of the prepared stand-in
        class: String,
    },

    /// A second method call was captured before the first was consumed
    #[error("Method {method} was called on a stand-in while the capture of {pending} was still pending. Either no functor was requested for the earlier call, or back-to-back calls were made on stand-ins without consuming the capture between them")]
    UnconsumedCapture {
        /// The capture that was never consumed
        pending: String,
        /// The call that found the slot occupied
        method: String,
    },

    /// Void command requested without the two-step protocol
    #[error("No call to a method was made after a \"prepare_void()\": {method} was captured without one, and this session requires it before \"void_command()\"")]
    UnpreparedVoid {
        /// Captured method
        method: String,
    },
}

impl FunctoError {
    /// Whether this is a capture protocol violation
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, FunctoError::ProtocolOrderViolation(_))
    }
}
