pub mod error;
pub mod room;
pub mod signaling;

pub use error::ProtocolError;
pub use room::RoomRegistry;
pub use signaling::{PeerDirectory, RelayRouter, ws_handler};

use std::sync::Arc;

/// Shared server state handed to the websocket layer. The registry is an
/// explicitly constructed instance so tests can run isolated servers.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<PeerDirectory>,
    pub router: RelayRouter,
}

impl AppState {
    pub fn new() -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let directory = Arc::new(PeerDirectory::new());
        let router = RelayRouter::new(registry, directory.clone());
        Self { directory, router }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
