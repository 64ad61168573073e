use crate::media::{MediaEvent, MediaEventKind, MediaEventSender, MediaFactory};
use crate::negotiation::{NegotiationCoordinator, NegotiationState, SignalSender};
use crate::session::{ClientCommand, ClientError, ClientEvent};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use switchboard_core::{ClientMessage, NegotiationPayload, ParticipantId, ServerMessage, SessionId};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The request a `Requesting` client is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    Create,
    Join(SessionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    /// Create or join sent, waiting for the server's answer.
    Requesting(PendingRequest),
    Active {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
}

/// Client side of one session: the roster of remote participants and one
/// negotiation coordinator per roster entry.
pub struct SessionClient {
    factory: Arc<dyn MediaFactory>,
    signals: SignalSender,
    events: mpsc::UnboundedSender<ClientEvent>,
    media_tx: MediaEventSender,
    media_rx: mpsc::UnboundedReceiver<MediaEvent>,
    state: ClientState,
    /// Replies still owed to requests abandoned by a leave. The server
    /// answers requests in order, so these arrive before any newer reply.
    abandoned_replies: usize,
    roster: HashMap<ParticipantId, NegotiationCoordinator>,
}

impl SessionClient {
    pub fn new(
        factory: Arc<dyn MediaFactory>,
        outbound: mpsc::UnboundedSender<ClientMessage>,
    ) -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (media_tx, media_rx) = mpsc::unbounded_channel();

        let client = Self {
            factory,
            signals: SignalSender::new(outbound),
            events,
            media_tx,
            media_rx,
            state: ClientState::Idle,
            abandoned_replies: 0,
            roster: HashMap::new(),
        };
        (client, events_rx)
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn local_participant(&self) -> Option<ParticipantId> {
        match &self.state {
            ClientState::Active { participant_id, .. } => Some(*participant_id),
            _ => None,
        }
    }

    pub fn roster(&self) -> Vec<ParticipantId> {
        self.roster.keys().copied().collect()
    }

    pub fn coordinator(&self, participant_id: &ParticipantId) -> Option<&NegotiationCoordinator> {
        self.roster.get(participant_id)
    }

    pub fn create_session(&mut self) -> Result<(), ClientError> {
        self.request(PendingRequest::Create)
    }

    pub fn join_session(&mut self, session_id: SessionId) -> Result<(), ClientError> {
        self.request(PendingRequest::Join(session_id))
    }

    /// Leaves the current session or abandons the pending request, closing
    /// every negotiation. Does nothing while idle.
    pub async fn leave(&mut self) {
        match &self.state {
            ClientState::Idle => return,
            ClientState::Requesting(_) => self.abandoned_replies += 1,
            ClientState::Active { .. } => {}
        }
        let was_active = self.is_active();
        let _ = self.signals.send(ClientMessage::Leave);

        self.close_all().await;
        if was_active {
            self.factory.release_local_media().await;
        }
        self.state = ClientState::Idle;
        self.emit(ClientEvent::Left);
    }

    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<ServerMessage>,
        mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    ) {
        info!("Session client started");

        loop {
            tokio::select! {
                msg = inbound.recv() => {
                    match msg {
                        Some(m) => self.handle_server_message(m).await,
                        None => {
                            warn!("Signaling channel closed");
                            break;
                        }
                    }
                }

                cmd = commands.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Leaving session.");
                            break;
                        }
                    }
                }

                Some(event) = self.media_rx.recv() => self.handle_media_event(event).await,
            }
        }

        self.leave().await;
        info!("Session client finished");
    }

    pub async fn handle_command(&mut self, cmd: ClientCommand) {
        match cmd {
            ClientCommand::CreateSession => {
                if let Err(e) = self.create_session() {
                    warn!("Create request ignored: {}", e);
                }
            }
            ClientCommand::JoinSession { session_id } => {
                if let Err(e) = self.join_session(session_id) {
                    warn!("Join request ignored: {}", e);
                }
            }
            ClientCommand::Leave => self.leave().await,
            ClientCommand::Renegotiate { participant_id } => {
                let Some(coordinator) = self.roster.get_mut(&participant_id) else {
                    warn!("Renegotiation requested for unknown participant {}", participant_id);
                    return;
                };
                let before = coordinator.state();
                coordinator.renegotiate().await;
                let after = coordinator.state();
                self.emit_state(participant_id, before, after);
            }
        }
    }

    pub async fn handle_server_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::IceConfig { ice_servers } => {
                debug!("Received ICE config: {} servers", ice_servers.len());
                self.factory.set_ice_servers(ice_servers);
            }

            ServerMessage::SessionCreated {
                session_id,
                participant_id,
            } => {
                if self.take_reply(&PendingRequest::Create, &session_id) {
                    self.activate(session_id, participant_id).await;
                }
            }

            ServerMessage::JoinResult {
                success: true,
                session_id: Some(session_id),
                participant_id: Some(participant_id),
                ..
            } => {
                let pending = PendingRequest::Join(session_id.clone());
                if self.take_reply(&pending, &session_id) {
                    self.activate(session_id, participant_id).await;
                }
            }

            ServerMessage::JoinResult { reason, .. } => {
                if !self.take_join_failure() {
                    return;
                }
                let reason = reason.unwrap_or_else(|| "Join was refused".to_owned());
                warn!("Join failed: {}", reason);
                self.state = ClientState::Idle;
                self.emit(ClientEvent::JoinFailed { reason });
            }

            ServerMessage::ParticipantJoined { participant_id } => {
                self.on_participant_joined(participant_id).await
            }

            ServerMessage::ParticipantLeft { participant_id } => {
                self.on_participant_left(participant_id).await
            }

            ServerMessage::Signal {
                sender_participant_id,
                payload,
            } => self.on_signal(sender_participant_id, payload).await,
        }
    }

    pub async fn handle_media_event(&mut self, event: MediaEvent) {
        let MediaEvent { remote, kind } = event;
        match kind {
            MediaEventKind::Candidate(candidate) => match self.roster.get_mut(&remote) {
                Some(coordinator) => coordinator.handle_local_candidate(candidate),
                None => debug!("Local candidate for departed participant {}", remote),
            },
            MediaEventKind::RemoteTrack { kind } => {
                if self.roster.contains_key(&remote) {
                    self.emit(ClientEvent::RemoteTrack {
                        participant_id: remote,
                        kind,
                    });
                }
            }
        }
    }

    fn request(&mut self, pending: PendingRequest) -> Result<(), ClientError> {
        if self.state != ClientState::Idle {
            return Err(ClientError::Busy);
        }
        let msg = match &pending {
            PendingRequest::Create => ClientMessage::CreateSession,
            PendingRequest::Join(session_id) => ClientMessage::JoinSession {
                session_id: session_id.clone(),
            },
        };
        self.signals
            .send(msg)
            .map_err(|_| ClientError::ChannelClosed)?;
        self.state = ClientState::Requesting(pending);
        Ok(())
    }

    /// Whether a successful create/join reply answers the pending request.
    /// Replies owed to abandoned requests are swallowed; the leave that
    /// abandoned them already released the server side.
    fn take_reply(&mut self, answers: &PendingRequest, session_id: &SessionId) -> bool {
        if self.abandoned_replies > 0 {
            self.abandoned_replies -= 1;
            debug!("Discarding reply to an abandoned request");
            return false;
        }
        if self.state == ClientState::Requesting(answers.clone()) {
            return true;
        }

        if self.state == ClientState::Idle {
            warn!("Unsolicited confirmation for session {}, leaving it", session_id);
            let _ = self.signals.send(ClientMessage::Leave);
        } else {
            warn!("Unsolicited confirmation for session {} ignored", session_id);
        }
        false
    }

    fn take_join_failure(&mut self) -> bool {
        if self.abandoned_replies > 0 {
            self.abandoned_replies -= 1;
            debug!("Discarding join failure for an abandoned request");
            return false;
        }
        if matches!(self.state, ClientState::Requesting(PendingRequest::Join(_))) {
            return true;
        }
        warn!("Join failure without a pending join ignored");
        false
    }

    async fn activate(&mut self, session_id: SessionId, participant_id: ParticipantId) {
        if let Err(e) = self.factory.acquire_local_media().await {
            error!("Cannot start local media: {}", e);
            let _ = self.signals.send(ClientMessage::Leave);
            self.state = ClientState::Idle;
            self.emit(ClientEvent::MediaFailure {
                reason: e.to_string(),
            });
            return;
        }

        info!("In session {} as {}", session_id, participant_id);
        self.state = ClientState::Active {
            session_id: session_id.clone(),
            participant_id,
        };
        self.emit(ClientEvent::Ready {
            session_id,
            participant_id,
        });
    }

    // Whoever is already present offers to the newcomer.
    async fn on_participant_joined(&mut self, participant_id: ParticipantId) {
        if !self.is_active() {
            debug!("Ignoring join of {} outside a session", participant_id);
            return;
        }
        if self.local_participant() == Some(participant_id)
            || self.roster.contains_key(&participant_id)
        {
            debug!("Participant {} already known", participant_id);
            return;
        }

        let Some(mut coordinator) = self.open_coordinator(participant_id).await else {
            return;
        };
        self.emit(ClientEvent::ParticipantJoined { participant_id });

        coordinator.initiate().await;
        let after = coordinator.state();
        self.roster.insert(participant_id, coordinator);
        self.emit_state(participant_id, NegotiationState::Idle, after);
    }

    async fn on_participant_left(&mut self, participant_id: ParticipantId) {
        let Some(mut coordinator) = self.roster.remove(&participant_id) else {
            debug!("Unknown participant {} left", participant_id);
            return;
        };

        let before = coordinator.state();
        coordinator.close().await;
        self.emit(ClientEvent::ParticipantLeft { participant_id });
        self.emit_state(participant_id, before, NegotiationState::Closed);
    }

    async fn on_signal(&mut self, sender: ParticipantId, payload: Value) {
        if !self.is_active() {
            debug!("Signal from {} outside a session dropped", sender);
            return;
        }

        let payload = match NegotiationPayload::from_value(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Undecodable negotiation payload from {}: {}", sender, e);
                return;
            }
        };

        // First contact may beat the join notification.
        if !self.roster.contains_key(&sender) {
            let Some(coordinator) = self.open_coordinator(sender).await else {
                return;
            };
            self.roster.insert(sender, coordinator);
            self.emit(ClientEvent::ParticipantJoined {
                participant_id: sender,
            });
        }

        let Some(coordinator) = self.roster.get_mut(&sender) else {
            return;
        };
        let before = coordinator.state();
        coordinator.handle_payload(payload).await;
        let after = coordinator.state();
        self.emit_state(sender, before, after);
    }

    async fn open_coordinator(&mut self, remote: ParticipantId) -> Option<NegotiationCoordinator> {
        match self.factory.open(remote, self.media_tx.clone()).await {
            Ok(media) => Some(NegotiationCoordinator::new(
                remote,
                media,
                self.signals.clone(),
            )),
            Err(e) => {
                error!("Cannot open media towards {}: {}", remote, e);
                None
            }
        }
    }

    async fn close_all(&mut self) {
        for (participant_id, mut coordinator) in std::mem::take(&mut self.roster) {
            let before = coordinator.state();
            coordinator.close().await;
            self.emit_state(participant_id, before, NegotiationState::Closed);
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.state, ClientState::Active { .. })
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    fn emit_state(&self, participant_id: ParticipantId, before: NegotiationState, after: NegotiationState) {
        if before != after {
            self.emit(ClientEvent::NegotiationStateChanged {
                participant_id,
                state: after,
            });
        }
    }
}
