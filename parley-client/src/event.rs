use crate::transport::RemoteTrack;
use parley_core::{PeerId, RoomId};

/// Events surfaced to the embedding application (UI layer, bots, tests).
#[derive(Debug, Clone)]
pub enum MeetingEvent {
    RoomJoined { room_id: RoomId, peers: Vec<PeerId> },
    Left { room_id: RoomId },
    PeerJoined { peer_id: PeerId },
    PeerLeft { peer_id: PeerId },
    SessionEstablished { peer_id: PeerId },
    RemoteTrack { peer_id: PeerId, track: RemoteTrack },
    Chat { peer_id: PeerId, message: String, timestamp: i64 },
    ServerError { message: String },
}
