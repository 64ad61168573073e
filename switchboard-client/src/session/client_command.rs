use switchboard_core::{ParticipantId, SessionId};

/// Requests from the embedding application (UI) to the session client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    CreateSession,
    JoinSession { session_id: SessionId },
    Leave,
    /// Local media changed; send a fresh offer where we are the initiator.
    Renegotiate { participant_id: ParticipantId },
}
