use crate::transport::ConnectionHandle;
use std::collections::HashMap;
use std::time::SystemTime;
use switchboard_core::{ParticipantId, SessionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Terminated,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub address: ConnectionHandle,
}

/// Membership of one session. Only the registry mutates it, always while
/// holding the session's lock.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: SystemTime,
    status: SessionStatus,
    participants: HashMap<ParticipantId, Participant>,
}

impl Session {
    pub(super) fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: SystemTime::now(),
            status: SessionStatus::Active,
            participants: HashMap::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participants.contains_key(participant_id)
    }

    pub fn address_of(&self, participant_id: &ParticipantId) -> Option<&ConnectionHandle> {
        self.participants.get(participant_id).map(|p| &p.address)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn peers_of(&self, participant_id: &ParticipantId) -> impl Iterator<Item = &Participant> {
        self.participants
            .values()
            .filter(move |p| &p.id != participant_id)
    }

    pub(super) fn insert(&mut self, participant: Participant) {
        self.participants.insert(participant.id, participant);
    }

    pub(super) fn remove(&mut self, participant_id: &ParticipantId) -> Option<Participant> {
        self.participants.remove(participant_id)
    }

    pub(super) fn terminate(&mut self) {
        self.status = SessionStatus::Terminated;
    }
}
