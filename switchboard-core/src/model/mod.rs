mod participant;
mod payload;
mod session;
mod signaling;

pub use participant::ParticipantId;
pub use payload::{IceCandidate, NegotiationPayload};
pub use session::SessionId;
pub use signaling::{ClientMessage, IceServerConfig, ServerMessage};
