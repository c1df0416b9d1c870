use std::sync::Arc;

use async_trait::async_trait;
use parley_core::{CandidateInit, IceServerConfig};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;

use crate::media::LocalTrack;

use super::backend::{
    ConnectionHealth, MediaKind, NegotiationBackend, NegotiationFactory, RemoteTrack, SdpKind,
    TransportError, TransportEvent,
};

/// Connection-level knobs, usually just the ICE server list.
#[derive(Debug, Clone, Default)]
pub struct RtcConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl RtcConfig {
    fn to_rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }
}

/// Production negotiation primitive backed by an RTCPeerConnection.
pub struct RtcBackend {
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcBackend {
    pub async fn new(
        config: &RtcConfig,
        local_tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, TransportError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let peer_connection = Arc::new(
            api.new_peer_connection(config.to_rtc_configuration())
                .await
                .map_err(|e| TransportError::Negotiation(e.to_string()))?,
        );

        for track in local_tracks {
            peer_connection
                .add_track(Arc::clone(track))
                .await
                .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        }

        let candidate_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |candidate| {
            let candidate_events = candidate_events.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else {
                    return;
                };
                match candidate.to_json() {
                    Ok(init) => {
                        let init = CandidateInit {
                            candidate: init.candidate,
                            sdp_mid: init.sdp_mid,
                            sdp_mline_index: init.sdp_mline_index,
                        };
                        let _ = candidate_events
                            .send(TransportEvent::CandidateGathered(init))
                            .await;
                    }
                    Err(err) => warn!(error = %err, "failed to serialize local candidate"),
                }
            })
        }));

        let track_events = events.clone();
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let track_events = track_events.clone();
            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => MediaKind::Audio,
                    _ => MediaKind::Video,
                };
                let remote = RemoteTrack {
                    id: track.id(),
                    kind,
                };
                let _ = track_events.send(TransportEvent::RemoteTrack(remote)).await;
            })
        }));

        let health_events = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(move |state| {
            let health_events = health_events.clone();
            Box::pin(async move {
                debug!(?state, "peer connection state changed");
                let health = match state {
                    RTCPeerConnectionState::Connecting => ConnectionHealth::Connecting,
                    RTCPeerConnectionState::Connected => ConnectionHealth::Connected,
                    RTCPeerConnectionState::Disconnected => ConnectionHealth::Disconnected,
                    RTCPeerConnectionState::Failed => ConnectionHealth::Failed,
                    RTCPeerConnectionState::Closed => ConnectionHealth::Closed,
                    _ => return,
                };
                let _ = health_events.send(TransportEvent::Health(health)).await;
            })
        }));

        peer_connection.on_negotiation_needed(Box::new(move || {
            let events = events.clone();
            Box::pin(async move {
                let _ = events.send(TransportEvent::NegotiationNeeded).await;
            })
        }));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl NegotiationBackend for RtcBackend {
    async fn produce_offer(&self) -> Result<String, TransportError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        Ok(offer.sdp)
    }

    async fn produce_answer(&self) -> Result<String, TransportError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))?;
        Ok(answer.sdp)
    }

    async fn apply_local(&self, kind: SdpKind, sdp: &str) -> Result<(), TransportError> {
        let description = build_description(kind, sdp)?;
        self.peer_connection
            .set_local_description(description)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))
    }

    async fn apply_remote(&self, kind: SdpKind, sdp: &str) -> Result<(), TransportError> {
        let description = build_description(kind, sdp)?;
        self.peer_connection
            .set_remote_description(description)
            .await
            .map_err(|e| TransportError::Negotiation(e.to_string()))
    }

    async fn add_remote_candidate(&self, candidate: &CandidateInit) -> Result<(), TransportError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_mline_index,
            ..Default::default()
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .map_err(|e| TransportError::Candidate(e.to_string()))
    }

    async fn close(&self) {
        if let Err(err) = self.peer_connection.close().await {
            warn!(error = %err, "error while closing peer connection");
        }
    }
}

fn build_description(kind: SdpKind, sdp: &str) -> Result<RTCSessionDescription, TransportError> {
    let result = match kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp.to_owned()),
        SdpKind::Answer => RTCSessionDescription::answer(sdp.to_owned()),
    };
    result.map_err(|e| TransportError::Negotiation(e.to_string()))
}

/// Builds one `RtcBackend` per remote peer from a shared config.
pub struct RtcFactory {
    config: RtcConfig,
}

impl RtcFactory {
    pub fn new(config: RtcConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NegotiationFactory for RtcFactory {
    async fn create(
        &self,
        local_tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn NegotiationBackend>, TransportError> {
        let backend = RtcBackend::new(&self.config, local_tracks, events).await?;
        Ok(Box::new(backend))
    }
}
