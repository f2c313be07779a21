//! Per-session actor
//!
//! Inbound transport messages and local user intents are merged into one
//! ordered stream and applied to the session one at a time; the shared
//! state is never touched from two places concurrently.

use std::time::Duration;

use crate::error::Result;
use crate::link::Link;
use crate::negotiate;
use crate::session::config::SessionConfig;
use crate::session::game::GameSession;
use crate::session::stats::LinkStats;
use crate::types::{SessionSnapshot, SessionUpdate};

/// Commands that can be sent to the peer actor
#[derive(Debug, Clone, Copy)]
pub enum PeerCommand {
    /// Place the local mark
    Move { row: usize, col: usize },
    /// Ask the remote peer for a rematch
    RequestReplay,
    /// Accept the remote peer's rematch request
    AcceptReplay,
    /// Decline the remote peer's rematch request
    DeclineReplay,
    /// Stop the actor's run loop
    Stop,
}

/// Result of one `Peer::step` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Session state changed; re-render from a fresh snapshot
    Changed(SessionUpdate),
    /// Step timeout elapsed with nothing to do
    Timeout,
    /// The inbound side of the link ended; the session keeps its state
    /// and continues to serve commands and snapshots
    LinkClosed,
    /// Stop command received
    Stop,
}

/// Builder for peer sessions
///
/// Configures the session before opening it; `open()` emits the handshake.
#[must_use]
pub struct PeerBuilder {
    link: Link,
    config: SessionConfig,
}

impl PeerBuilder {
    fn new(link: Link) -> Self {
        Self {
            link,
            config: SessionConfig::default(),
        }
    }

    /// Use a fixed handshake token instead of drawing one
    pub fn token(mut self, token: u32) -> Self {
        self.config.token = Some(token);
        self
    }

    /// Set the step timeout in milliseconds
    pub fn step_timeout_break_ms(mut self, timeout_ms: u64) -> Self {
        self.config.step_timeout_break_ms = timeout_ms;
        self
    }

    /// Build the peer and emit the handshake exactly once
    pub fn open(self) -> Result<Peer> {
        let token = self.config.token.unwrap_or_else(negotiate::draw_token);
        let mut session = GameSession::with_token(token, self.link.tx);
        session.start()?;

        let (command_tx, command_rx) = flume::unbounded();
        Ok(Peer {
            session,
            link_rx: self.link.rx,
            link_open: true,
            command_rx,
            command_tx,
            step_timeout: Duration::from_millis(self.config.step_timeout_break_ms),
            stopped: false,
        })
    }
}

/// The session actor: owns a [`GameSession`] and one end of the link
///
/// Drive it by awaiting [`Peer::step`] in a loop; feed user intents through
/// the sender returned by [`Peer::sender`].
pub struct Peer {
    session: GameSession,
    link_rx: flume::Receiver<String>,
    /// Cleared once the inbound stream ends so a dead link cannot spin the
    /// select loop
    link_open: bool,
    command_rx: flume::Receiver<PeerCommand>,
    command_tx: flume::Sender<PeerCommand>,
    step_timeout: Duration,
    stopped: bool,
}

impl Peer {
    /// Start configuring a peer over the given link
    pub fn builder(link: Link) -> PeerBuilder {
        PeerBuilder::new(link)
    }

    /// Get a sender for sending commands to this peer
    pub fn sender(&self) -> flume::Sender<PeerCommand> {
        self.command_tx.clone()
    }

    /// Read-only view of the session for rendering
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// The underlying session
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Link traffic counters
    pub fn stats(&self) -> LinkStats {
        self.session.stats()
    }

    /// Execute one step of the session actor
    ///
    /// Waits for the next event on the merged stream and applies it.
    /// Returns when either:
    /// - the session visibly changed (returns `Changed`)
    /// - the step timeout elapsed (returns `Timeout`)
    /// - the inbound link stream ended (returns `LinkClosed`, once)
    /// - a Stop command was received (returns `Stop`)
    ///
    /// Events that change nothing (transport noise, rejected commands) are
    /// consumed without returning.
    pub async fn step(&mut self) -> StepResult {
        if self.stopped {
            return StepResult::Stop;
        }

        let sleep = tokio::time::sleep(self.step_timeout);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                // Timeout elapsed
                () = &mut sleep => {
                    return StepResult::Timeout;
                }
                // Message arrived from the peer
                inbound = self.link_rx.recv_async(), if self.link_open => {
                    match inbound {
                        Ok(raw) => {
                            match self.session.ingest(&raw) {
                                SessionUpdate::None => continue,
                                update => return StepResult::Changed(update),
                            }
                        }
                        Err(_) => {
                            tracing::info!("link inbound stream ended, session frozen as-is");
                            self.link_open = false;
                            return StepResult::LinkClosed;
                        }
                    }
                }
                // Command received from the application
                command = self.command_rx.recv_async() => match command {
                    Err(_) => {
                        tracing::info!("peer command channel closed, stopping");
                        self.stopped = true;
                        return StepResult::Stop;
                    }
                    Ok(PeerCommand::Stop) => {
                        tracing::info!("peer received Stop command, exiting");
                        self.stopped = true;
                        return StepResult::Stop;
                    }
                    Ok(PeerCommand::Move { row, col }) => {
                        if self.session.attempt_local_move(row, col) {
                            return StepResult::Changed(SessionUpdate::LocalMoved { row, col });
                        }
                        tracing::debug!("move ({row},{col}) not applicable, ignored");
                        continue;
                    }
                    Ok(PeerCommand::RequestReplay) => {
                        if self.session.request_replay() {
                            return StepResult::Changed(SessionUpdate::ReplayRequested);
                        }
                        tracing::debug!("replay request not applicable, ignored");
                        continue;
                    }
                    Ok(PeerCommand::AcceptReplay) => {
                        if self.session.accept_replay() {
                            return StepResult::Changed(SessionUpdate::GameReset);
                        }
                        tracing::debug!("replay accept not applicable, ignored");
                        continue;
                    }
                    Ok(PeerCommand::DeclineReplay) => {
                        if self.session.decline_replay() {
                            return StepResult::Changed(SessionUpdate::ReplayDeclined);
                        }
                        tracing::debug!("replay decline not applicable, ignored");
                        continue;
                    }
                }
            }
        }
    }
}
