use crate::model::participant::ParticipantId;
use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Frames a client sends to the signaling server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientMessage {
    CreateSession,
    JoinSession {
        session_id: SessionId,
    },
    Leave,
    /// `payload` is forwarded untouched; the server never looks inside it.
    RelaySignal {
        recipient_participant_id: ParticipantId,
        payload: Value,
    },
}

/// Frames the signaling server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ServerMessage {
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    SessionCreated {
        session_id: SessionId,
        participant_id: ParticipantId,
    },
    JoinResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<SessionId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        participant_id: Option<ParticipantId>,
    },
    ParticipantJoined {
        participant_id: ParticipantId,
    },
    ParticipantLeft {
        participant_id: ParticipantId,
    },
    Signal {
        sender_participant_id: ParticipantId,
        payload: Value,
    },
}

impl ServerMessage {
    pub fn join_accepted(session_id: SessionId, participant_id: ParticipantId) -> Self {
        Self::JoinResult {
            success: true,
            reason: None,
            session_id: Some(session_id),
            participant_id: Some(participant_id),
        }
    }

    pub fn join_rejected(reason: impl Into<String>) -> Self {
        Self::JoinResult {
            success: false,
            reason: Some(reason.into()),
            session_id: None,
            participant_id: None,
        }
    }
}
