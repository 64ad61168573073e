use crate::registry::{Participant, RegistryError, Session};
use crate::transport::{ConnectionHandle, ConnectionId};
use dashmap::DashMap;
use std::sync::Arc;
use switchboard_core::{ParticipantId, SessionId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Exclusive access to one session's membership. Other membership changes
/// on the same session wait until this guard is dropped.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Reverse index entry: who is speaking on a given connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub session_id: SessionId,
    pub participant_id: ParticipantId,
}

/// Result of a successful join. The session stays locked until `session`
/// is dropped, so the caller can announce the newcomer before anyone else
/// changes the membership.
pub struct Joined {
    pub participant_id: ParticipantId,
    pub session: SessionGuard,
}

pub enum Removal {
    /// Nothing to do: the participant (or its session) was already gone.
    NotPresent,
    /// The participant was the last member; the session no longer exists.
    SessionClosed,
    /// The participant was removed; the guard covers the remaining members.
    Remaining(SessionGuard),
}

/// Authoritative map of sessions, their participants and the connections
/// used to reach them.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Mutex<Session>>>,
    bindings: DashMap<ConnectionId, Binding>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, address: ConnectionHandle) -> (SessionId, ParticipantId) {
        let session_id = SessionId::new();
        let participant_id = ParticipantId::new();
        let connection_id = address.id();

        let mut session = Session::new(session_id.clone());
        session.insert(Participant {
            id: participant_id,
            address,
        });

        self.bindings.insert(
            connection_id,
            Binding {
                session_id: session_id.clone(),
                participant_id,
            },
        );
        self.sessions
            .insert(session_id.clone(), Arc::new(Mutex::new(session)));

        info!(
            "Session {} created by participant {}",
            session_id, participant_id
        );
        (session_id, participant_id)
    }

    pub async fn join_session(
        &self,
        session_id: &SessionId,
        address: ConnectionHandle,
    ) -> Result<Joined, RegistryError> {
        let session = self.session_handle(session_id)?;
        let mut guard = session.lock_owned().await;

        // The session may have emptied while we waited for the lock.
        if !guard.is_active() {
            return Err(RegistryError::SessionNotFound(session_id.clone()));
        }

        let participant_id = ParticipantId::new();
        self.bindings.insert(
            address.id(),
            Binding {
                session_id: session_id.clone(),
                participant_id,
            },
        );
        guard.insert(Participant {
            id: participant_id,
            address,
        });

        info!(
            "Participant {} joined session {} ({} members)",
            participant_id,
            session_id,
            guard.len()
        );
        Ok(Joined {
            participant_id,
            session: guard,
        })
    }

    /// Idempotent. Emptied sessions are terminated and dropped before the
    /// lock is released, so waiters observe `SessionNotFound`.
    pub async fn remove_participant(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
    ) -> Removal {
        let Ok(session) = self.session_handle(session_id) else {
            return Removal::NotPresent;
        };
        let mut guard = session.clone().lock_owned().await;

        let Some(participant) = guard.remove(participant_id) else {
            return Removal::NotPresent;
        };
        self.bindings
            .remove_if(&participant.address.id(), |_, b| {
                &b.participant_id == participant_id
            });

        if guard.is_empty() {
            guard.terminate();
            self.sessions
                .remove_if(session_id, |_, s| Arc::ptr_eq(s, &session));
            let lifetime = guard.created_at().elapsed().unwrap_or_default();
            info!(
                "Session {} terminated after {:?} (no participants left)",
                guard.id(),
                lifetime
            );
            return Removal::SessionClosed;
        }

        info!(
            "Participant {} left session {} ({} members)",
            participant_id,
            session_id,
            guard.len()
        );
        Removal::Remaining(guard)
    }

    pub async fn lookup_address(
        &self,
        session_id: &SessionId,
        participant_id: &ParticipantId,
    ) -> Result<ConnectionHandle, RegistryError> {
        let session = self.session_handle(session_id)?;
        let guard = session.lock().await;

        guard
            .address_of(participant_id)
            .cloned()
            .ok_or_else(|| RegistryError::ParticipantNotFound {
                session_id: session_id.clone(),
                participant_id: *participant_id,
            })
    }

    pub fn resolve_by_address(&self, connection_id: ConnectionId) -> Result<Binding, RegistryError> {
        self.bindings
            .get(&connection_id)
            .map(|b| b.value().clone())
            .ok_or(RegistryError::UnboundAddress(connection_id))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn contains_session(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub async fn participant_count(&self, session_id: &SessionId) -> Option<usize> {
        let session = self.session_handle(session_id).ok()?;
        let guard = session.lock().await;
        Some(guard.len())
    }

    // Clones the Arc so the DashMap shard lock is released before awaiting.
    fn session_handle(&self, session_id: &SessionId) -> Result<Arc<Mutex<Session>>, RegistryError> {
        match self.sessions.get(session_id) {
            Some(entry) => Ok(entry.value().clone()),
            None => {
                debug!("Lookup of unknown session {}", session_id);
                Err(RegistryError::SessionNotFound(session_id.clone()))
            }
        }
    }
}
