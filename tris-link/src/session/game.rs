//! The per-session game state machine

use crate::error::{LinkError, Result};
use crate::negotiate;
use crate::session::board::Board;
use crate::session::stats::{LinkStats, StatsTracker};
use crate::session::wire::WireMessage;
use crate::types::{
    Outcome, ReplayState, Scores, SessionPhase, SessionSnapshot, SessionUpdate, Symbol,
};

/// One two-party game session
///
/// Owns the board, turn, outcome, replay and score state. Inbound transport
/// messages go through [`GameSession::ingest`], user intents through the
/// mutating entry points; outbound wire text is pushed through the link's
/// sender at the moment a transition fires. The caller must serialize
/// inbound-message handling against user-intent handling; `Peer` is the
/// actor that does exactly that.
pub struct GameSession {
    /// Locally drawn handshake token
    token: u32,
    /// Set once the handshake completes; the remote plays the complement
    local_symbol: Option<Symbol>,
    board: Board,
    /// Symbol that may place the next mark
    turn: Symbol,
    outcome: Outcome,
    replay: ReplayState,
    /// Symbol that opens the current game; flips at every reset
    starting_symbol: Symbol,
    scores: Scores,
    /// Guards score counting; cleared only by reset
    scored: bool,
    handshake_sent: bool,
    outbound: flume::Sender<String>,
    stats: StatsTracker,
}

impl GameSession {
    /// Session with a randomly drawn handshake token
    pub fn new(outbound: flume::Sender<String>) -> Self {
        Self::with_token(negotiate::draw_token(), outbound)
    }

    /// Session with a caller-chosen token (deterministic setups and tests)
    pub fn with_token(token: u32, outbound: flume::Sender<String>) -> Self {
        Self {
            token,
            local_symbol: None,
            board: Board::default(),
            turn: Symbol::First,
            outcome: Outcome::Pending,
            replay: ReplayState::NotRequested,
            starting_symbol: Symbol::First,
            scores: Scores::default(),
            scored: false,
            handshake_sent: false,
            outbound,
            stats: StatsTracker::new(),
        }
    }

    /// Emit the handshake message carrying the local token
    ///
    /// Must be invoked exactly once per session, before any role is known;
    /// a second call is refused.
    pub fn start(&mut self) -> Result<()> {
        if self.handshake_sent {
            return Err(LinkError::HandshakeAlreadySent);
        }
        self.handshake_sent = true;
        if !self.send(WireMessage::Handshake(self.token)) {
            return Err(LinkError::LinkClosed);
        }
        tracing::info!("session opened with handshake token {}", self.token);
        Ok(())
    }

    /// Consume one inbound transport message, in arrival order
    ///
    /// Unrecognized or out-of-protocol messages are dropped without state
    /// change; transport noise must never take the session down. Returns
    /// what changed so the caller can re-render.
    pub fn ingest(&mut self, raw: &str) -> SessionUpdate {
        self.stats.add_inbound(raw.len());
        let Some(message) = WireMessage::parse(raw) else {
            tracing::debug!("ignoring unrecognized message {raw:?}");
            return SessionUpdate::None;
        };
        match message {
            WireMessage::Handshake(token) => self.on_handshake(token),
            WireMessage::ReplayRequest => self.on_replay_request(),
            WireMessage::ReplayAccepted => self.on_replay_accepted(),
            WireMessage::ReplayDeclined => self.on_replay_declined(),
            WireMessage::Move { row, col } => self.on_remote_move(row, col),
        }
    }

    /// Try to place the local mark at (row, col)
    ///
    /// No-op returning `false` unless the handshake completed, the game is
    /// running, it is the local turn, the indices are on the grid and the
    /// target cell is free. On success the move is placed, sent to the peer
    /// and the turn flips.
    pub fn attempt_local_move(&mut self, row: usize, col: usize) -> bool {
        let Some(local) = self.local_symbol else {
            return false;
        };
        if self.outcome != Outcome::Pending
            || self.turn != local
            || !Board::in_bounds(row, col)
            || !self.board.is_empty_cell(row, col)
        {
            return false;
        }
        self.board.set(row, col, local);
        self.send(WireMessage::Move { row, col });
        self.turn = local.other();
        self.settle_outcome();
        true
    }

    /// Ask the peer for a rematch
    ///
    /// Valid only once the game is over and no request is in flight.
    pub fn request_replay(&mut self) -> bool {
        if self.outcome == Outcome::Pending || self.replay != ReplayState::NotRequested {
            return false;
        }
        self.replay = ReplayState::LocalRequestSent;
        self.send(WireMessage::ReplayRequest);
        true
    }

    /// Accept the peer's pending rematch request and reset for a new game
    pub fn accept_replay(&mut self) -> bool {
        if self.replay != ReplayState::RemoteRequestReceived {
            return false;
        }
        self.send(WireMessage::ReplayAccepted);
        self.reset();
        true
    }

    /// Decline the peer's pending rematch request; the board is untouched
    pub fn decline_replay(&mut self) -> bool {
        if self.replay != ReplayState::RemoteRequestReceived {
            return false;
        }
        self.replay = ReplayState::NotRequested;
        self.send(WireMessage::ReplayDeclined);
        true
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            local_symbol: self.local_symbol,
            board: self.board.clone(),
            turn: self.turn,
            outcome: self.outcome,
            replay: self.replay,
            starting_symbol: self.starting_symbol,
            scores: self.scores,
        }
    }

    /// Session lifecycle, derived from roles and outcome
    pub fn phase(&self) -> SessionPhase {
        if self.local_symbol.is_none() {
            SessionPhase::AwaitingPeer
        } else if self.outcome == Outcome::Pending {
            SessionPhase::InProgress
        } else {
            SessionPhase::Finished
        }
    }

    /// The locally drawn handshake token
    pub fn token(&self) -> u32 {
        self.token
    }

    /// The local peer's symbol, once the handshake completed
    pub fn local_symbol(&self) -> Option<Symbol> {
        self.local_symbol
    }

    /// Link traffic counters for this session
    pub fn stats(&self) -> LinkStats {
        self.stats.get_stats()
    }

    fn on_handshake(&mut self, remote_token: u32) -> SessionUpdate {
        if self.local_symbol.is_some() {
            tracing::debug!("ignoring stray handshake after role assignment");
            return SessionUpdate::None;
        }
        // Indistinguishable from an echo of our own handshake. An exact
        // token tie therefore leaves both sessions waiting for a peer.
        if remote_token == self.token {
            tracing::debug!("ignoring handshake echoing our own token {remote_token}");
            return SessionUpdate::None;
        }
        let local = negotiate::resolve_role(self.token, remote_token);
        self.local_symbol = Some(local);
        self.turn = self.starting_symbol;
        tracing::info!(
            "handshake complete: local token {} vs remote {}, playing {}",
            self.token,
            remote_token,
            local
        );
        SessionUpdate::PeerJoined { local }
    }

    fn on_remote_move(&mut self, row: usize, col: usize) -> SessionUpdate {
        let Some(local) = self.local_symbol else {
            tracing::debug!("ignoring move before handshake");
            return SessionUpdate::None;
        };
        let remote = local.other();
        // Mirror of the local-move preconditions: a duplicated, delayed or
        // corrupted move message must not disturb the board.
        if self.outcome != Outcome::Pending
            || self.turn != remote
            || !self.board.is_empty_cell(row, col)
        {
            tracing::debug!("dropping out-of-protocol remote move {row},{col}");
            return SessionUpdate::None;
        }
        self.board.set(row, col, remote);
        self.turn = local;
        self.settle_outcome();
        SessionUpdate::RemoteMoved { row, col }
    }

    fn on_replay_request(&mut self) -> SessionUpdate {
        if self.local_symbol.is_none() || self.outcome == Outcome::Pending {
            tracing::debug!("ignoring replay request outside a finished game");
            return SessionUpdate::None;
        }
        match self.replay {
            ReplayState::NotRequested => {
                self.replay = ReplayState::RemoteRequestReceived;
                SessionUpdate::ReplayOffered
            }
            // Both sides asked at once: that is agreement. Each performs
            // the identical reset, no further message needed.
            ReplayState::LocalRequestSent => {
                tracing::info!("simultaneous replay requests, resetting for a new game");
                self.reset();
                SessionUpdate::GameReset
            }
            // Duplicate of a request we already hold
            ReplayState::RemoteRequestReceived => SessionUpdate::None,
        }
    }

    fn on_replay_accepted(&mut self) -> SessionUpdate {
        if self.replay != ReplayState::LocalRequestSent {
            tracing::debug!("ignoring unsolicited replay acceptance");
            return SessionUpdate::None;
        }
        self.reset();
        SessionUpdate::GameReset
    }

    fn on_replay_declined(&mut self) -> SessionUpdate {
        if self.replay != ReplayState::LocalRequestSent {
            return SessionUpdate::None;
        }
        self.replay = ReplayState::NotRequested;
        SessionUpdate::ReplayDeclined
    }

    /// Re-evaluate the board and record a win at most once per game
    fn settle_outcome(&mut self) {
        self.outcome = self.board.evaluate();
        if let Outcome::Won(winner) = self.outcome {
            if !self.scored {
                self.scores.record(winner);
                self.scored = true;
            }
        }
    }

    /// Full reset for a rematch
    ///
    /// Board cleared, outcome back to pending, starting symbol flipped so
    /// the first-move advantage alternates across the series. Both peers
    /// run this from agreed state, so no coordination message is needed.
    /// Roles and scores survive.
    fn reset(&mut self) {
        self.board.clear();
        self.outcome = Outcome::Pending;
        self.replay = ReplayState::NotRequested;
        self.starting_symbol = self.starting_symbol.other();
        self.turn = self.starting_symbol;
        self.scored = false;
    }

    fn send(&self, message: WireMessage) -> bool {
        let text = message.to_string();
        let len = text.len();
        let sent = self.outbound.send(text).is_ok();
        if sent {
            self.stats.add_outbound(len);
        } else {
            tracing::warn!("peer link gone, dropped outbound message '{message}'");
        }
        sent
    }
}
