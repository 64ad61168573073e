use std::sync::Arc;
use std::time::Duration;
use switchboard_client::{ClientCommand, ClientEvent, NegotiationState, SessionClient};
use switchboard_core::{ClientMessage, ParticipantId, SessionId};
use switchboard_server::{ConnectionHandle, SignalingRouter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::utils::MockMediaFactory;

/// Timeout for a single expected event (ms).
pub const EVENT_TIMEOUT_MS: u64 = 5000;

/// How long to watch for an event that must not happen (ms).
pub const QUIET_PERIOD_MS: u64 = 200;

/// A [`SessionClient`] running on its own task, wired straight into a
/// router the way the WebSocket handler would wire it.
pub struct InProcessClient {
    pub media: Arc<MockMediaFactory>,
    commands: mpsc::UnboundedSender<ClientCommand>,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    task: JoinHandle<()>,
}

impl InProcessClient {
    pub fn attach(router: &SignalingRouter, media: Arc<MockMediaFactory>) -> Self {
        let (address, inbound) = ConnectionHandle::channel();
        router.on_connect(&address);

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let router = router.clone();
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                router.handle_message(&address, msg).await;
            }
            router.handle_disconnect(address.id()).await;
        });

        let (client, events) = SessionClient::new(media.clone(), outbound);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(client.run(inbound, command_rx));

        Self {
            media,
            commands,
            events,
            task,
        }
    }

    pub fn send(&self, cmd: ClientCommand) {
        self.commands.send(cmd).expect("Client task is gone");
    }

    pub async fn create(&mut self) -> (SessionId, ParticipantId) {
        self.send(ClientCommand::CreateSession);
        self.expect_ready().await
    }

    pub async fn join(&mut self, session_id: &SessionId) -> ParticipantId {
        self.send(ClientCommand::JoinSession {
            session_id: session_id.clone(),
        });
        self.expect_ready().await.1
    }

    async fn expect_ready(&mut self) -> (SessionId, ParticipantId) {
        match self
            .wait_for(|e| matches!(e, ClientEvent::Ready { .. } | ClientEvent::JoinFailed { .. }))
            .await
        {
            ClientEvent::Ready {
                session_id,
                participant_id,
            } => (session_id, participant_id),
            other => panic!("Expected Ready, got {:?}", other),
        }
    }

    pub async fn next_event(&mut self) -> ClientEvent {
        tokio::time::timeout(Duration::from_millis(EVENT_TIMEOUT_MS), self.events.recv())
            .await
            .expect("Timed out waiting for a client event")
            .expect("Client event channel closed")
    }

    /// Skips events until one matches.
    pub async fn wait_for<F>(&mut self, pred: F) -> ClientEvent
    where
        F: Fn(&ClientEvent) -> bool,
    {
        loop {
            let event = self.next_event().await;
            if pred(&event) {
                return event;
            }
        }
    }

    pub async fn wait_for_state(&mut self, remote: ParticipantId, state: NegotiationState) {
        self.wait_for(|e| {
            *e == ClientEvent::NegotiationStateChanged {
                participant_id: remote,
                state,
            }
        })
        .await;
    }

    /// Collects whatever arrives during the quiet period.
    pub async fn drain_quietly(&mut self) -> Vec<ClientEvent> {
        let mut out = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_millis(QUIET_PERIOD_MS);
        while let Ok(Some(event)) = tokio::time::timeout_at(deadline, self.events.recv()).await {
            out.push(event);
        }
        out
    }

    /// Kills the client without a goodbye.
    pub fn crash(self) {
        self.task.abort();
    }

    pub async fn shutdown(self) {
        drop(self.commands);
        self.task.await.expect("Client task panicked");
    }
}

/// Polls `check` until it holds or the event timeout expires.
pub async fn eventually<F>(check: F)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(EVENT_TIMEOUT_MS);
    while !check() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "Condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
