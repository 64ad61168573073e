use tracing::info;

use crate::media::SdpKind;
use crate::negotiation::{NegotiationCoordinator, NegotiationError, NegotiationState, Role};

impl NegotiationCoordinator {
    pub(super) async fn handle_answer(&mut self, sdp: String) -> Result<(), NegotiationError> {
        if self.state == NegotiationState::Closed {
            return Err(NegotiationError::Closed(self.remote));
        }
        if self.role != Some(Role::Initiator) {
            return Err(NegotiationError::Malformed(
                "answer received but no offer was sent".into(),
            ));
        }
        if self.state != NegotiationState::Negotiating || self.answer_received {
            return Err(NegotiationError::Malformed(format!(
                "duplicate answer while {:?}",
                self.state
            )));
        }

        self.media()?
            .set_remote_description(SdpKind::Answer, sdp)
            .await?;
        self.remote_description_applied = true;
        self.answer_received = true;
        self.apply_pending_candidates().await;

        self.state = NegotiationState::Connected;
        info!("Negotiation with {} connected", self.remote);
        Ok(())
    }
}
