//! The transport seam: a pair of text-message channel endpoints
//!
//! The protocol core never talks to a socket. A transport collaborator
//! (Bluetooth, TCP, an in-memory pair) delivers one UTF-8 string per
//! protocol message, in arrival order, and accepts outbound strings for the
//! peer. Message framing is the transport's job.

/// One end of a point-to-point text link
///
/// `tx` carries outbound messages to the peer; `rx` yields inbound messages
/// in arrival order. The inbound stream is finite: it ends when the remote
/// side of the transport is gone, and it does not restart.
#[derive(Debug, Clone)]
pub struct Link {
    /// Outbound messages to the peer
    pub tx: flume::Sender<String>,
    /// Inbound messages from the peer, in arrival order
    pub rx: flume::Receiver<String>,
}

impl Link {
    /// Two cross-connected in-memory ends
    ///
    /// Everything one end sends, the other receives, in order. Used by
    /// tests and local same-process play; real transports bridge their
    /// socket into the same shape with [`Link::from_parts`].
    pub fn pair() -> (Link, Link) {
        let (a_tx, b_rx) = flume::unbounded();
        let (b_tx, a_rx) = flume::unbounded();
        (Link { tx: a_tx, rx: a_rx }, Link { tx: b_tx, rx: b_rx })
    }

    /// Wrap channel endpoints provided by an external transport
    pub fn from_parts(tx: flume::Sender<String>, rx: flume::Receiver<String>) -> Link {
        Link { tx, rx }
    }
}
