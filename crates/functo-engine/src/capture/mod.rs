//! Capture: stand-ins, interception and the capture slot

pub mod ambient;
mod interceptor;
pub mod record;
pub mod session;
pub mod slot;
pub mod stand_in;

pub use record::CaptureRecord;
pub use session::CaptureSession;
pub use slot::{CaptureSlot, SlotPhase};
pub use stand_in::StandIn;
