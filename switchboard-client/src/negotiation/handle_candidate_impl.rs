use switchboard_core::{IceCandidate, NegotiationPayload};
use tracing::{debug, warn};

use crate::negotiation::{NegotiationCoordinator, NegotiationError, NegotiationState};

impl NegotiationCoordinator {
    pub(super) async fn handle_remote_candidate(
        &mut self,
        candidate: IceCandidate,
    ) -> Result<(), NegotiationError> {
        if self.state == NegotiationState::Closed {
            return Err(NegotiationError::Closed(self.remote));
        }

        if !self.remote_description_applied {
            debug!("Buffering candidate from {} until its description arrives", self.remote);
            self.pending_remote_candidates.push(candidate);
            return Ok(());
        }

        self.media()?.add_candidate(candidate).await?;
        Ok(())
    }

    /// Candidate gathered by our own media stack for this remote.
    pub fn handle_local_candidate(&mut self, candidate: IceCandidate) {
        if self.state == NegotiationState::Closed {
            return;
        }
        if !self.local_description_sent {
            self.pending_local_candidates.push(candidate);
            return;
        }

        if let Err(e) = self
            .signals
            .relay(self.remote, &NegotiationPayload::Candidate(candidate))
        {
            warn!("Failed to relay candidate to {}: {}", self.remote, e);
        }
    }

    pub(super) async fn apply_pending_candidates(&mut self) {
        let pending = std::mem::take(&mut self.pending_remote_candidates);
        let Some(media) = self.media.as_deref() else {
            return;
        };

        for candidate in pending {
            if let Err(e) = media.add_candidate(candidate).await {
                warn!("Buffered candidate from {} rejected: {}", self.remote, e);
            }
        }
    }

    pub(super) fn flush_local_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.pending_local_candidates) {
            if let Err(e) = self
                .signals
                .relay(self.remote, &NegotiationPayload::Candidate(candidate))
            {
                warn!("Failed to relay candidate to {}: {}", self.remote, e);
            }
        }
    }
}
