//! Wire codec: plain UTF-8 text, one message per transport frame
//!
//! There is no length prefix and no envelope; kinds are told apart by
//! prefix and shape, checked in a fixed priority order.

use std::fmt;

/// A decoded protocol message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMessage {
    /// Role-negotiation token
    Handshake(u32),
    /// Peer requests a rematch
    ReplayRequest,
    /// Peer accepted our rematch request
    ReplayAccepted,
    /// Peer declined our rematch request
    ReplayDeclined,
    /// A move; row and col are both in [0, 2]
    Move { row: usize, col: usize },
}

impl WireMessage {
    /// Decode one inbound message
    ///
    /// Kinds are tested in priority order: the handshake prefix first (so a
    /// stray duplicate is never misread as a move), then the replay
    /// literals, then the comma fallback for moves. Anything else, including
    /// a move with unparseable or out-of-range coordinates, decodes to
    /// `None` and is dropped upstream.
    pub fn parse(raw: &str) -> Option<WireMessage> {
        let raw = raw.trim();
        if let Some(token) = raw.strip_prefix("HANDSHAKE:") {
            return token.trim().parse().ok().map(WireMessage::Handshake);
        }
        match raw {
            "REPLAY_REQUEST" => return Some(WireMessage::ReplayRequest),
            "REPLAY_ACCEPTED" => return Some(WireMessage::ReplayAccepted),
            "REPLAY_DECLINED" => return Some(WireMessage::ReplayDeclined),
            _ => {}
        }
        let (row, col) = raw.split_once(',')?;
        let row: usize = row.trim().parse().ok()?;
        let col: usize = col.trim().parse().ok()?;
        if row > 2 || col > 2 {
            return None;
        }
        Some(WireMessage::Move { row, col })
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireMessage::Handshake(token) => write!(f, "HANDSHAKE:{token}"),
            WireMessage::ReplayRequest => write!(f, "REPLAY_REQUEST"),
            WireMessage::ReplayAccepted => write!(f, "REPLAY_ACCEPTED"),
            WireMessage::ReplayDeclined => write!(f, "REPLAY_DECLINED"),
            WireMessage::Move { row, col } => write!(f, "{row},{col}"),
        }
    }
}
