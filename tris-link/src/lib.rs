//! # tris-link
//!
//! A two-party turn-based game session (tris, a.k.a. tic-tac-toe) coordinated
//! over a single ordered point-to-point text link.
//!
//! ## Overview
//!
//! Two identical endpoints negotiate their roles with a one-round token
//! exchange (no central coordinator), then alternate moves over the link,
//! detect wins and draws locally, and agree on rematches through a small
//! replay sub-protocol that keeps both boards in lockstep.
//!
//! The transport is an external collaborator handed in as a [`Link`]: a pair
//! of channel endpoints carrying UTF-8 text messages in arrival order. The
//! presentation layer is likewise external: it reads [`SessionSnapshot`]s
//! and forwards user intents as [`PeerCommand`]s.
//!
//! ## Key Features
//!
//! - Symmetric peer-role arbitration via random handshake tokens
//! - Strict turn alternation with silent rejection of out-of-protocol moves
//! - Win/draw detection recomputed from scratch after every move
//! - Rematch request/accept/decline with deterministic starting-symbol
//!   alternation across games
//! - Per-symbol score tracking that survives rematches
//! - Link traffic statistics
//!
//! ## Example
//!
//! ```rust
//! use tris_link::{GameSession, Link, Symbol};
//!
//! // Loopback transport; a real client bridges its socket instead.
//! let (a_end, b_end) = Link::pair();
//! let mut a = GameSession::with_token(42, a_end.tx.clone());
//! let mut b = GameSession::with_token(7, b_end.tx.clone());
//!
//! // Each side emits its handshake exactly once.
//! a.start().unwrap();
//! b.start().unwrap();
//!
//! // Deliver each side's traffic to the other.
//! for raw in b_end.rx.drain() {
//!     b.ingest(&raw);
//! }
//! for raw in a_end.rx.drain() {
//!     a.ingest(&raw);
//! }
//!
//! // 42 >= 7, so the first endpoint plays X.
//! assert_eq!(a.local_symbol(), Some(Symbol::First));
//! assert_eq!(b.local_symbol(), Some(Symbol::Second));
//! ```

// Module declarations
pub mod error;
pub mod link;
pub mod negotiate;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use error::{LinkError, Result};
pub use link::Link;
pub use session::board::Board;
pub use session::game::GameSession;
pub use session::peer::{Peer, PeerBuilder, PeerCommand, StepResult};
pub use session::stats::LinkStats;
pub use session::wire::WireMessage;
pub use types::{
    Cell, Outcome, ReplayState, Scores, SessionPhase, SessionSnapshot, SessionUpdate, Symbol,
};
