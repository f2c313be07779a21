//! Configuration for a peer session

/// Configuration consumed by `PeerBuilder`
#[derive(Debug, Clone)]
pub(crate) struct SessionConfig {
    /// Fixed handshake token; drawn at random when `None`
    pub token: Option<u32>,

    /// Timeout for the step() method in milliseconds
    /// step() returns when either the session changed or this timeout elapses
    pub step_timeout_break_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token: None,
            step_timeout_break_ms: 5000,
        }
    }
}
