use switchboard_core::NegotiationPayload;
use tracing::{info, warn};

use crate::media::SdpKind;
use crate::negotiation::{NegotiationCoordinator, NegotiationError, NegotiationState, Role};

impl NegotiationCoordinator {
    /// Sends the first offer. Only the member that was already present when
    /// the remote joined calls this.
    pub async fn initiate(&mut self) {
        if self.state != NegotiationState::Idle {
            warn!(
                "Not initiating towards {}: negotiation already {:?}",
                self.remote, self.state
            );
            return;
        }

        match self.send_offer().await {
            Ok(()) => {
                self.role = Some(Role::Initiator);
                self.state = NegotiationState::Negotiating;
                info!("Offer sent to {}", self.remote);
                self.flush_local_candidates();
            }
            Err(e) => self.report("offer", e),
        }
    }

    /// Fresh offer after a local media change. Initiator only.
    pub async fn renegotiate(&mut self) {
        if self.role != Some(Role::Initiator) || self.state != NegotiationState::Connected {
            warn!(
                "Renegotiation with {} ignored in {:?} as {:?}",
                self.remote, self.state, self.role
            );
            return;
        }

        match self.send_offer().await {
            Ok(()) => {
                self.answer_received = false;
                self.state = NegotiationState::Negotiating;
                info!("Renegotiation offer sent to {}", self.remote);
            }
            Err(e) => self.report("renegotiation offer", e),
        }
    }

    async fn send_offer(&mut self) -> Result<(), NegotiationError> {
        let media = self.media()?;
        let sdp = media.create_offer().await?;
        media.set_local_description(SdpKind::Offer, sdp.clone()).await?;

        self.signals
            .relay(self.remote, &NegotiationPayload::Offer { sdp })?;
        self.local_description_sent = true;
        Ok(())
    }
}
