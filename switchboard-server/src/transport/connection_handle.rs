use std::fmt;
use switchboard_core::ServerMessage;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery address of one connected client.
///
/// Frames pushed here are written to the socket by the connection's writer
/// task in FIFO order. Pushing never blocks.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbox: mpsc::UnboundedSender<ServerMessage>,
}

impl ConnectionHandle {
    pub fn new(outbox: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            id: ConnectionId::new(),
            outbox,
        }
    }

    /// Handle plus the receiving end a writer task (or a test) drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `false` when the connection is already gone; the frame is dropped.
    pub fn deliver(&self, msg: ServerMessage) -> bool {
        match self.outbox.send(msg) {
            Ok(()) => true,
            Err(_) => {
                debug!("Dropping frame for closed connection {}", self.id);
                false
            }
        }
    }
}
