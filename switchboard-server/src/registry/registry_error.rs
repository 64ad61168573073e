use crate::transport::ConnectionId;
use switchboard_core::{ParticipantId, SessionId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Session {0} was not found or is no longer active")]
    SessionNotFound(SessionId),

    #[error("Participant {participant_id} is not part of session {session_id}")]
    ParticipantNotFound {
        session_id: SessionId,
        participant_id: ParticipantId,
    },

    #[error("Connection {0} is not bound to any participant")]
    UnboundAddress(ConnectionId),
}
