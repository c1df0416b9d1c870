use async_trait::async_trait;
use parley_core::CandidateInit;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::media::LocalTrack;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Negotiation failed: {0}")]
    Negotiation(String),
    #[error("Candidate rejected: {0}")]
    Candidate(String),
    #[error("Transport closed")]
    Closed,
}

/// Which half of the offer/answer exchange a description belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// A decoded media stream arriving from the remote peer.
#[derive(Debug, Clone)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHealth {
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events the negotiation primitive pushes back into the session loop.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    CandidateGathered(CandidateInit),
    RemoteTrack(RemoteTrack),
    Health(ConnectionHealth),
    NegotiationNeeded,
}

/// Seam over the peer-to-peer negotiation primitive. The session state
/// machine drives this trait and never touches the webrtc stack directly,
/// which keeps the machine testable with recording mocks.
#[async_trait]
pub trait NegotiationBackend: Send + Sync {
    /// Creates a local offer and returns its SDP. Does not apply it.
    async fn produce_offer(&self) -> Result<String, TransportError>;

    /// Creates a local answer from the current remote offer.
    async fn produce_answer(&self) -> Result<String, TransportError>;

    async fn apply_local(&self, kind: SdpKind, sdp: &str) -> Result<(), TransportError>;

    async fn apply_remote(&self, kind: SdpKind, sdp: &str) -> Result<(), TransportError>;

    async fn add_remote_candidate(&self, candidate: &CandidateInit) -> Result<(), TransportError>;

    async fn close(&self);
}

/// Builds one backend per remote peer, wired to push its events into the
/// owning session's transport channel.
#[async_trait]
pub trait NegotiationFactory: Send + Sync {
    async fn create(
        &self,
        local_tracks: &[LocalTrack],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn NegotiationBackend>, TransportError>;
}
