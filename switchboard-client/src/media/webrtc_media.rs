use crate::media::{
    MediaError, MediaEvent, MediaEventKind, MediaEventSender, MediaFactory, MediaNegotiator,
    SdpKind,
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use switchboard_core::{IceCandidate, IceServerConfig, ParticipantId};
use tokio::sync::Mutex;
use tracing::{debug, info};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

const DATA_CHANNEL_LABEL: &str = "switchboard";

fn primitive(e: webrtc::Error) -> MediaError {
    MediaError::Primitive(e.to_string())
}

/// Native media stack built on the `webrtc` crate.
///
/// There is no capture device to open on a native host, so acquiring local
/// media means building the codec/interceptor stack shared by every peer
/// connection of the session.
pub struct WebRtcMediaFactory {
    api: Mutex<Option<Arc<API>>>,
    ice_servers: RwLock<Vec<IceServerConfig>>,
}

impl WebRtcMediaFactory {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            api: Mutex::new(None),
            ice_servers: RwLock::new(ice_servers),
        }
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        let ice_servers = self
            .ice_servers
            .read()
            .map(|servers| servers.clone())
            .unwrap_or_default();

        RTCConfiguration {
            ice_servers: ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }
}

impl Default for WebRtcMediaFactory {
    fn default() -> Self {
        Self::new(vec![IceServerConfig::stun("stun:stun.l.google.com:19302")])
    }
}

#[async_trait]
impl MediaFactory for WebRtcMediaFactory {
    async fn acquire_local_media(&self) -> Result<(), MediaError> {
        let mut api = self.api.lock().await;
        if api.is_some() {
            return Ok(());
        }

        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(|e| MediaError::Unavailable(e.to_string()))?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| MediaError::Unavailable(e.to_string()))?;

        *api = Some(Arc::new(
            APIBuilder::new()
                .with_media_engine(media_engine)
                .with_interceptor_registry(registry)
                .build(),
        ));
        info!("WebRTC media stack ready");
        Ok(())
    }

    async fn release_local_media(&self) {
        self.api.lock().await.take();
    }

    async fn open(
        &self,
        remote: ParticipantId,
        events: MediaEventSender,
    ) -> Result<Box<dyn MediaNegotiator>, MediaError> {
        let api = self
            .api
            .lock()
            .await
            .clone()
            .ok_or_else(|| MediaError::Unavailable("local media was not acquired".into()))?;

        let peer_connection = Arc::new(
            api.new_peer_connection(self.rtc_configuration())
                .await
                .map_err(primitive)?,
        );

        // Trickle ICE: hand local candidates to the coordinator.
        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = events.send(MediaEvent {
                    remote,
                    kind: MediaEventKind::Candidate(IceCandidate {
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_m_line_index: init.sdp_mline_index,
                    }),
                });
            })
        }));

        let track_events = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();

                Box::pin(async move {
                    let kind = track.kind().to_string();
                    debug!("Remote {} track from {}", kind, remote);
                    let _ = events.send(MediaEvent {
                        remote,
                        kind: MediaEventKind::RemoteTrack { kind },
                    });
                })
            },
        ));

        Ok(Box::new(WebRtcNegotiator {
            peer_connection,
            data_channel: Mutex::new(None),
        }))
    }

    fn set_ice_servers(&self, ice_servers: Vec<IceServerConfig>) {
        if let Ok(mut current) = self.ice_servers.write() {
            *current = ice_servers;
        }
    }
}

pub struct WebRtcNegotiator {
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Mutex<Option<Arc<RTCDataChannel>>>,
}

impl WebRtcNegotiator {
    fn description(kind: SdpKind, sdp: String) -> Result<RTCSessionDescription, MediaError> {
        match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp),
            SdpKind::Answer => RTCSessionDescription::answer(sdp),
        }
        .map_err(primitive)
    }
}

#[async_trait]
impl MediaNegotiator for WebRtcNegotiator {
    async fn create_offer(&self) -> Result<String, MediaError> {
        // An offer without any m-line negotiates nothing.
        let mut data_channel = self.data_channel.lock().await;
        if data_channel.is_none() {
            let channel = self
                .peer_connection
                .create_data_channel(DATA_CHANNEL_LABEL, None)
                .await
                .map_err(primitive)?;
            *data_channel = Some(channel);
        }

        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(primitive)?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String, MediaError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(primitive)?;
        Ok(answer.sdp)
    }

    async fn set_local_description(&self, kind: SdpKind, sdp: String) -> Result<(), MediaError> {
        let desc = Self::description(kind, sdp)?;
        self.peer_connection
            .set_local_description(desc)
            .await
            .map_err(primitive)
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<(), MediaError> {
        let desc = Self::description(kind, sdp)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(primitive)
    }

    async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), MediaError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(primitive)
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            debug!("Error while closing peer connection: {}", e);
        }
    }
}
