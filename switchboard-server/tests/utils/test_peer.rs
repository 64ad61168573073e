use serde_json::Value;
use switchboard_core::{ClientMessage, ParticipantId, ServerMessage, SessionId};
use switchboard_server::{ConnectionHandle, SignalingRouter};
use tokio::sync::mpsc;

/// An in-process connection: frames go straight into the router and replies
/// are read from the connection's outbox.
pub struct TestPeer {
    pub address: ConnectionHandle,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestPeer {
    /// Connects and swallows the initial `IceConfig` greeting.
    pub fn connect(router: &SignalingRouter) -> Self {
        let (address, mut rx) = ConnectionHandle::channel();
        router.on_connect(&address);

        let greeting = rx.try_recv().expect("Expected IceConfig greeting");
        assert!(matches!(greeting, ServerMessage::IceConfig { .. }));

        Self { address, rx }
    }

    pub async fn send(&self, router: &SignalingRouter, msg: ClientMessage) {
        router.handle_message(&self.address, msg).await;
    }

    pub async fn create(&mut self, router: &SignalingRouter) -> (SessionId, ParticipantId) {
        self.send(router, ClientMessage::CreateSession).await;
        match self.next() {
            ServerMessage::SessionCreated {
                session_id,
                participant_id,
            } => (session_id, participant_id),
            other => panic!("Expected SessionCreated, got {:?}", other),
        }
    }

    /// Joins and returns the assigned participant id, panicking on refusal.
    pub async fn join(&mut self, router: &SignalingRouter, session_id: &SessionId) -> ParticipantId {
        match self.try_join(router, session_id).await {
            ServerMessage::JoinResult {
                success: true,
                participant_id: Some(id),
                ..
            } => id,
            other => panic!("Expected successful JoinResult, got {:?}", other),
        }
    }

    pub async fn try_join(&mut self, router: &SignalingRouter, session_id: &SessionId) -> ServerMessage {
        self.send(
            router,
            ClientMessage::JoinSession {
                session_id: session_id.clone(),
            },
        )
        .await;
        self.next()
    }

    pub async fn relay(&self, router: &SignalingRouter, recipient: ParticipantId, payload: Value) {
        self.send(
            router,
            ClientMessage::RelaySignal {
                recipient_participant_id: recipient,
                payload,
            },
        )
        .await;
    }

    /// Next queued frame. Router handlers deliver before they return, so
    /// anything expected is already queued.
    pub fn next(&mut self) -> ServerMessage {
        self.rx.try_recv().expect("Expected a queued server message")
    }

    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }

    pub fn assert_silent(&mut self) {
        let pending = self.drain();
        assert!(pending.is_empty(), "Unexpected messages: {:?}", pending);
    }
}
