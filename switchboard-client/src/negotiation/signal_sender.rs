use crate::negotiation::NegotiationError;
use switchboard_core::{ClientMessage, NegotiationPayload, ParticipantId};
use tokio::sync::mpsc;

/// Outbound half of the signaling channel as seen by the client core.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: mpsc::UnboundedSender<ClientMessage>,
}

impl SignalSender {
    pub fn new(tx: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self { tx }
    }

    pub fn send(&self, msg: ClientMessage) -> Result<(), NegotiationError> {
        self.tx.send(msg).map_err(|_| NegotiationError::ChannelClosed)
    }

    pub fn relay(
        &self,
        recipient: ParticipantId,
        payload: &NegotiationPayload,
    ) -> Result<(), NegotiationError> {
        self.send(ClientMessage::RelaySignal {
            recipient_participant_id: recipient,
            payload: payload.to_value()?,
        })
    }
}
