use crate::media::MediaError;
use switchboard_core::ParticipantId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NegotiationError {
    /// Duplicate or out-of-order offer/answer.
    #[error("malformed negotiation: {0}")]
    Malformed(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("negotiation with {0} is closed")]
    Closed(ParticipantId),

    #[error("signaling channel is closed")]
    ChannelClosed,

    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
