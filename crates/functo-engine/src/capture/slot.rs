//! Capture slot state machine
//!
//! ```text
//!            open                 intercept
//!   EMPTY ──────────▶ PREPARED ──────────────▶ FILLED
//!     │                  │                      │
//!     │ intercept        │ open / consume       │ open / intercept
//!     ▼                  ▼                      ▼
//!   FILLED             ERROR                  ERROR
//!
//!   FILLED ── consume ──▶ EMPTY        EMPTY ── consume ──▶ ERROR
//! ```
//!
//! Every ERROR transition leaves the slot EMPTY.

use super::record::CaptureRecord;
use crate::error::{FunctoResult, ProtocolViolation};

/// Observable phase of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    /// Nothing pending
    Empty,
    /// Opened for a void capture; waiting for the call
    Prepared,
    /// Holding one capture record
    Filled,
}

#[derive(Debug, Default)]
enum SlotState {
    #[default]
    Empty,
    Prepared {
        class: String,
    },
    Filled {
        record: CaptureRecord,
        prepared: bool,
    },
}

/// Holder for at most one in-flight capture record
#[derive(Debug, Default)]
pub struct CaptureSlot {
    state: SlotState,
}

impl CaptureSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> SlotPhase {
        match self.state {
            SlotState::Empty => SlotPhase::Empty,
            SlotState::Prepared { .. } => SlotPhase::Prepared,
            SlotState::Filled { .. } => SlotPhase::Filled,
        }
    }

    /// Drop whatever is pending, returning the phase it was in
    pub fn reset(&mut self) -> SlotPhase {
        let phase = self.phase();
        self.state = SlotState::Empty;
        phase
    }

    /// Open the slot for a two-step void capture on a stand-in of `class`
    pub fn open(&mut self, class: &str) -> FunctoResult<()> {
        match self.state {
            SlotState::Empty => {
                tracing::trace!(class, "opened capture slot");
                self.state = SlotState::Prepared {
                    class: class.to_string(),
                };
                Ok(())
            }
            SlotState::Prepared { .. } | SlotState::Filled { .. } => {
                self.reset();
                Err(ProtocolViolation::BackToBackPrepare {
                    class: class.to_string(),
                }
                .into())
            }
        }
    }

    /// Store an intercepted call
    pub fn fill(&mut self, record: CaptureRecord) -> FunctoResult<()> {
        match std::mem::take(&mut self.state) {
            SlotState::Empty => {
                tracing::trace!(
                    class = record.declaring_name(),
                    method = %record.signature(),
                    "captured method call"
                );
                self.state = SlotState::Filled {
                    record,
                    prepared: false,
                };
                Ok(())
            }
            SlotState::Prepared { .. } => {
                tracing::trace!(
                    class = record.declaring_name(),
                    method = %record.signature(),
                    "captured prepared method call"
                );
                self.state = SlotState::Filled {
                    record,
                    prepared: true,
                };
                Ok(())
            }
            SlotState::Filled { record: pending, .. } => Err(ProtocolViolation::UnconsumedCapture {
                pending: pending.method(),
                method: record.method(),
            }
            .into()),
        }
    }

    /// Fail, and reset, unless a record is present
    pub fn ensure_filled(&mut self) -> FunctoResult<()> {
        let violation = match &self.state {
            SlotState::Filled { .. } => return Ok(()),
            SlotState::Empty => ProtocolViolation::NoCapture,
            SlotState::Prepared { class } => ProtocolViolation::PreparedWithoutCall {
                class: class.clone(),
            },
        };
        self.reset();
        Err(violation.into())
    }

    /// Borrow the pending record without consuming it
    pub fn peek(&mut self) -> FunctoResult<&CaptureRecord> {
        self.ensure_filled()?;
        match &self.state {
            SlotState::Filled { record, .. } => Ok(record),
            _ => Err(ProtocolViolation::NoCapture.into()),
        }
    }

    /// Whether the pending record arrived through `open`
    pub fn was_prepared(&self) -> bool {
        matches!(self.state, SlotState::Filled { prepared: true, .. })
    }

    /// Take the pending record, leaving the slot empty
    pub fn consume(&mut self) -> FunctoResult<CaptureRecord> {
        self.ensure_filled()?;
        match std::mem::take(&mut self.state) {
            SlotState::Filled { record, .. } => Ok(record),
            _ => Err(ProtocolViolation::NoCapture.into()),
        }
    }
}
