//! Capture session configuration

/// Capture session options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Accept `void_command()` for a capture that was not opened with
    /// `prepare_void()`. When disabled, such a request is a protocol
    /// violation.
    pub allow_unprepared_void: bool,
}

impl SessionOptions {
    /// Options that insist on the two-step void protocol
    pub fn strict() -> Self {
        Self {
            allow_unprepared_void: false,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_unprepared_void: true,
        }
    }
}
