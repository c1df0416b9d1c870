use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use webrtc::track::track_local::TrackLocal;

/// A capture-provider track handed to the negotiation primitive.
pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// Initial enable flags for the local media, carried over from the lobby.
#[derive(Debug, Clone, Copy)]
pub struct MediaPrefs {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaPrefs {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media access denied: {0}")]
    Denied(String),
    #[error("Media device unavailable: {0}")]
    Unavailable(String),
}

/// Capture-provider boundary. Denial is non-fatal: the affected media is
/// simply absent from the sessions.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self, prefs: MediaPrefs) -> Result<Vec<LocalTrack>, MediaError>;
}

/// Media source for clients that only signal (tests, bots, receive-only
/// participants).
pub struct NullMediaSource;

#[async_trait]
impl MediaSource for NullMediaSource {
    async fn acquire(&self, _prefs: MediaPrefs) -> Result<Vec<LocalTrack>, MediaError> {
        Ok(Vec::new())
    }
}
