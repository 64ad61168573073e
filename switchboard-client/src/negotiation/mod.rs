use crate::media::MediaNegotiator;
use switchboard_core::{IceCandidate, NegotiationPayload, ParticipantId};
use tracing::{debug, info, warn};

mod handle_answer_impl;
mod handle_candidate_impl;
mod handle_offer_impl;
mod initiate_impl;
mod negotiation_error;
mod signal_sender;

pub use negotiation_error::NegotiationError;
pub use signal_sender::SignalSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Negotiating,
    Connected,
    Closed,
}

/// Which side of the offer/answer exchange this coordinator plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// Drives the negotiation with one remote participant.
///
/// Malformed or out-of-order input never escapes as an error: it is logged
/// and dropped, and the state only advances once a step fully succeeded.
pub struct NegotiationCoordinator {
    remote: ParticipantId,
    state: NegotiationState,
    role: Option<Role>,
    media: Option<Box<dyn MediaNegotiator>>,
    signals: SignalSender,
    remote_description_applied: bool,
    local_description_sent: bool,
    answer_received: bool,
    pending_remote_candidates: Vec<IceCandidate>,
    pending_local_candidates: Vec<IceCandidate>,
}

impl NegotiationCoordinator {
    pub fn new(
        remote: ParticipantId,
        media: Box<dyn MediaNegotiator>,
        signals: SignalSender,
    ) -> Self {
        Self {
            remote,
            state: NegotiationState::Idle,
            role: None,
            media: Some(media),
            signals,
            remote_description_applied: false,
            local_description_sent: false,
            answer_received: false,
            pending_remote_candidates: Vec::new(),
            pending_local_candidates: Vec::new(),
        }
    }

    pub fn remote(&self) -> ParticipantId {
        self.remote
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_closed(&self) -> bool {
        self.state == NegotiationState::Closed
    }

    /// Remote candidates waiting for the remote description.
    pub fn buffered_remote_candidates(&self) -> usize {
        self.pending_remote_candidates.len()
    }

    /// Local candidates waiting for our own description to go out.
    pub fn buffered_local_candidates(&self) -> usize {
        self.pending_local_candidates.len()
    }

    pub async fn handle_payload(&mut self, payload: NegotiationPayload) {
        let kind = payload.kind();
        let result = match payload {
            NegotiationPayload::Offer { sdp } => self.handle_offer(sdp).await,
            NegotiationPayload::Answer { sdp } => self.handle_answer(sdp).await,
            NegotiationPayload::Candidate(candidate) => {
                self.handle_remote_candidate(candidate).await
            }
        };

        if let Err(e) = result {
            self.report(kind, e);
        }
    }

    /// Releases the media primitive and every buffer. Idempotent.
    pub async fn close(&mut self) {
        if self.state == NegotiationState::Closed {
            return;
        }
        self.state = NegotiationState::Closed;
        self.pending_remote_candidates.clear();
        self.pending_local_candidates.clear();

        if let Some(media) = self.media.take() {
            media.close().await;
        }
        info!("Negotiation with {} closed", self.remote);
    }

    fn media(&self) -> Result<&dyn MediaNegotiator, NegotiationError> {
        self.media
            .as_deref()
            .ok_or(NegotiationError::Closed(self.remote))
    }

    fn report(&self, what: &str, err: NegotiationError) {
        match err {
            NegotiationError::Closed(_) => {
                debug!("Ignoring {} for closed negotiation with {}", what, self.remote)
            }
            e => warn!("Dropped {} from {}: {}", what, self.remote, e),
        }
    }
}
