use crate::negotiation::NegotiationState;
use switchboard_core::{ParticipantId, SessionId};

/// What the embedding application gets told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Ready {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    JoinFailed {
        reason: String,
    },
    /// Local media could not be acquired; the client is back to idle.
    MediaFailure {
        reason: String,
    },
    ParticipantJoined {
        participant_id: ParticipantId,
    },
    ParticipantLeft {
        participant_id: ParticipantId,
    },
    NegotiationStateChanged {
        participant_id: ParticipantId,
        state: NegotiationState,
    },
    RemoteTrack {
        participant_id: ParticipantId,
        kind: String,
    },
    Left,
}
