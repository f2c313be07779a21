/// Error types for the tris-link library
use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors that can occur in session operations
///
/// The protocol routes most trouble into silent no-ops instead of errors:
/// malformed wire messages are dropped and precondition violations on the
/// mutating entry points return `false`. What remains here is lifecycle
/// misuse and the closed-link condition.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The handshake was already emitted for this session
    #[error("handshake already sent")]
    HandshakeAlreadySent,

    /// The outbound side of the link is gone
    #[error("link closed")]
    LinkClosed,
}
