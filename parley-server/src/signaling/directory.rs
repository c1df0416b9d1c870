use dashmap::DashMap;
use parley_core::{PeerId, ServerSignal};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Maps connected peers to their outbound signal channels. The websocket
/// layer registers a sender per connection; everything above it addresses
/// peers by id only.
pub struct PeerDirectory {
    peers: DashMap<PeerId, mpsc::UnboundedSender<ServerSignal>>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
        }
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<ServerSignal>) {
        self.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.peers.remove(peer_id);
    }

    /// Deliver a signal to a connected peer. A missing or closed channel is
    /// not an error: the peer has gone away and membership notifications
    /// reconcile everyone else.
    pub fn send(&self, peer_id: &PeerId, msg: ServerSignal) {
        if let Some(peer) = self.peers.get(peer_id) {
            if let Err(e) = peer.send(msg) {
                error!("Failed to queue signal for {}: {}", peer_id, e);
            }
        } else {
            debug!("Dropping signal for disconnected peer {}", peer_id);
        }
    }
}

impl Default for PeerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
