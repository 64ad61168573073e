use async_trait::async_trait;
use switchboard_core::{IceCandidate, IceServerConfig, ParticipantId};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// Camera, microphone or the negotiation stack itself is not available.
    #[error("local media unavailable: {0}")]
    Unavailable(String),

    #[error("media negotiation failed: {0}")]
    Primitive(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEventKind {
    /// A locally gathered candidate that must reach the remote side.
    Candidate(IceCandidate),
    RemoteTrack { kind: String },
}

/// Something the media stack reported for the link to `remote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEvent {
    pub remote: ParticipantId,
    pub kind: MediaEventKind,
}

pub type MediaEventSender = mpsc::UnboundedSender<MediaEvent>;

/// The execution environment's offer/answer engine for one remote peer.
#[async_trait]
pub trait MediaNegotiator: Send + Sync {
    async fn create_offer(&self) -> Result<String, MediaError>;

    async fn create_answer(&self) -> Result<String, MediaError>;

    async fn set_local_description(&self, kind: SdpKind, sdp: String) -> Result<(), MediaError>;

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<(), MediaError>;

    async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), MediaError>;

    async fn close(&self);
}

/// Opens negotiators and owns local media for the whole session.
#[async_trait]
pub trait MediaFactory: Send + Sync + 'static {
    async fn acquire_local_media(&self) -> Result<(), MediaError>;

    async fn release_local_media(&self) {}

    /// `events` receives `on_candidate` / `on_remote_track` for this peer.
    async fn open(
        &self,
        remote: ParticipantId,
        events: MediaEventSender,
    ) -> Result<Box<dyn MediaNegotiator>, MediaError>;

    fn set_ice_servers(&self, _ice_servers: Vec<IceServerConfig>) {}
}
