use parley_core::{ClientSignal, PeerId, RoomId, ServerSignal};
use parley_server::{AppState, ProtocolError};
use tokio::sync::mpsc;

/// A directory-registered peer without a real socket. Signals the router
/// would push to the connection land in `rx`; routing is synchronous, so
/// once `handle` returns the channel holds everything that was sent.
pub struct TestPeer {
    pub id: PeerId,
    rx: mpsc::UnboundedReceiver<ServerSignal>,
}

pub fn connect_peer(state: &AppState) -> TestPeer {
    let id = PeerId::new();
    let (tx, rx) = mpsc::unbounded_channel();
    state.directory.add_peer(id, tx);
    TestPeer { id, rx }
}

impl TestPeer {
    pub fn send(&self, state: &AppState, signal: ClientSignal) -> Result<(), ProtocolError> {
        state.router.handle(self.id, signal)
    }

    pub fn join(&self, state: &AppState, room: &str) -> Result<(), ProtocolError> {
        self.send(
            state,
            ClientSignal::Join {
                room_id: RoomId::from(room),
            },
        )
    }

    /// Simulate an abrupt socket close, exactly what the ws layer does when
    /// a connection drops without a leave message.
    pub fn disconnect(&self, state: &AppState) {
        state.router.peer_disconnected(self.id);
        state.directory.remove_peer(&self.id);
    }

    /// Everything delivered so far.
    pub fn drain(&mut self) -> Vec<ServerSignal> {
        let mut signals = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            signals.push(msg);
        }
        signals
    }

    pub fn expect_room_joined(&mut self) -> (RoomId, Vec<PeerId>) {
        for signal in self.drain() {
            if let ServerSignal::RoomJoined { room_id, peers, .. } = signal {
                return (room_id, peers);
            }
        }
        panic!("No room-joined received for {}", self.id);
    }
}
