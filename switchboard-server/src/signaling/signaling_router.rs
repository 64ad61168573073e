use crate::registry::{Binding, Removal, SessionRegistry};
use crate::transport::{ConnectionHandle, ConnectionId};
use serde_json::Value;
use std::sync::Arc;
use switchboard_core::{ClientMessage, IceServerConfig, ParticipantId, ServerMessage, SessionId};
use tracing::{debug, info};

struct RouterInner {
    registry: Arc<SessionRegistry>,
    ice_servers: Vec<IceServerConfig>,
}

/// Turns inbound client frames into registry operations and outbound
/// deliveries. Transport agnostic: every connection is just a
/// [`ConnectionHandle`].
#[derive(Clone)]
pub struct SignalingRouter {
    inner: Arc<RouterInner>,
}

impl SignalingRouter {
    pub fn new(registry: Arc<SessionRegistry>, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                registry,
                ice_servers,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.inner.registry
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    /// Greets a fresh connection with the ICE servers it should use.
    pub fn on_connect(&self, address: &ConnectionHandle) {
        address.deliver(ServerMessage::IceConfig {
            ice_servers: self.get_ice_servers(),
        });
    }

    pub async fn handle_message(&self, address: &ConnectionHandle, msg: ClientMessage) {
        match msg {
            ClientMessage::CreateSession => self.handle_create(address).await,
            ClientMessage::JoinSession { session_id } => self.handle_join(address, session_id).await,
            ClientMessage::Leave => self.handle_disconnect(address.id()).await,
            ClientMessage::RelaySignal {
                recipient_participant_id,
                payload,
            } => {
                self.handle_relay(address.id(), recipient_participant_id, payload)
                    .await
            }
        }
    }

    pub async fn handle_create(&self, address: &ConnectionHandle) {
        self.release_binding(address.id()).await;

        let (session_id, participant_id) = self.inner.registry.create_session(address.clone());
        address.deliver(ServerMessage::SessionCreated {
            session_id,
            participant_id,
        });
    }

    pub async fn handle_join(&self, address: &ConnectionHandle, session_id: SessionId) {
        self.release_binding(address.id()).await;

        let joined = match self
            .inner
            .registry
            .join_session(&session_id, address.clone())
            .await
        {
            Ok(joined) => joined,
            Err(e) => {
                info!("Join of {} refused: {}", session_id, e);
                address.deliver(ServerMessage::join_rejected(e.to_string()));
                return;
            }
        };

        let participant_id = joined.participant_id;
        address.deliver(ServerMessage::join_accepted(session_id, participant_id));

        // Still under the session lock: announcements reach every member in
        // the order the registry applied them.
        let announcement = ServerMessage::ParticipantJoined { participant_id };
        for peer in joined.session.peers_of(&participant_id) {
            peer.address.deliver(announcement.clone());
        }
    }

    pub async fn handle_relay(&self, origin: ConnectionId, recipient: ParticipantId, payload: Value) {
        let Ok(Binding {
            session_id,
            participant_id: sender,
        }) = self.inner.registry.resolve_by_address(origin)
        else {
            debug!("Relay from unbound connection {} dropped", origin);
            return;
        };

        let target = match self.inner.registry.lookup_address(&session_id, &recipient).await {
            Ok(target) => target,
            Err(e) => {
                debug!("Relay {} -> {} dropped: {}", sender, recipient, e);
                return;
            }
        };

        target.deliver(ServerMessage::Signal {
            sender_participant_id: sender,
            payload,
        });
        debug!("Relayed signal {} -> {} in {}", sender, recipient, session_id);
    }

    /// Safe to call any number of times for the same connection.
    pub async fn handle_disconnect(&self, origin: ConnectionId) {
        let Ok(Binding {
            session_id,
            participant_id,
        }) = self.inner.registry.resolve_by_address(origin)
        else {
            return;
        };

        match self
            .inner
            .registry
            .remove_participant(&session_id, &participant_id)
            .await
        {
            Removal::Remaining(session) => {
                let notice = ServerMessage::ParticipantLeft { participant_id };
                for peer in session.participants() {
                    peer.address.deliver(notice.clone());
                }
            }
            Removal::SessionClosed => {}
            Removal::NotPresent => {
                debug!("Participant {} already removed", participant_id);
            }
        }
    }

    // A connection speaks for one participant at a time.
    async fn release_binding(&self, origin: ConnectionId) {
        if self.inner.registry.resolve_by_address(origin).is_ok() {
            info!("Connection {} switches sessions, leaving the current one", origin);
            self.handle_disconnect(origin).await;
        }
    }
}
