use switchboard_core::NegotiationPayload;
use tracing::info;

use crate::media::SdpKind;
use crate::negotiation::{NegotiationCoordinator, NegotiationError, NegotiationState, Role};

impl NegotiationCoordinator {
    pub(super) async fn handle_offer(&mut self, sdp: String) -> Result<(), NegotiationError> {
        match (self.state, self.role) {
            (NegotiationState::Closed, _) => return Err(NegotiationError::Closed(self.remote)),
            (NegotiationState::Idle, _) | (_, Some(Role::Responder)) => {}
            (state, role) => {
                return Err(NegotiationError::Malformed(format!(
                    "offer received while {:?} as {:?}",
                    state, role
                )));
            }
        }

        self.media()?
            .set_remote_description(SdpKind::Offer, sdp)
            .await?;
        self.remote_description_applied = true;
        self.role = Some(Role::Responder);
        self.state = NegotiationState::Negotiating;
        self.apply_pending_candidates().await;

        let media = self.media()?;
        let answer = media.create_answer().await?;
        media
            .set_local_description(SdpKind::Answer, answer.clone())
            .await?;
        self.signals
            .relay(self.remote, &NegotiationPayload::Answer { sdp: answer })?;
        self.local_description_sent = true;
        self.flush_local_candidates();

        // Our half of the exchange is done once the answer is out.
        self.state = NegotiationState::Connected;
        info!("Answer sent to {}", self.remote);
        Ok(())
    }
}
