use dashmap::DashMap;
use parley_core::{PeerId, RoomId};
use tracing::info;

struct RoomState {
    /// Members in join order. Join order decides negotiation roles on the
    /// client side, so it is preserved here.
    peers: Vec<PeerId>,
    /// Last chat timestamp issued for this room.
    last_chat_ts: i64,
}

/// Tracks which peers are in which rooms. Rooms are created on first join
/// and deleted when their last member leaves.
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomState>,
    membership: DashMap<PeerId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            membership: DashMap::new(),
        }
    }

    /// Add a peer to a room, creating the room if needed. Returns the
    /// members that were already present, in join order, without the new
    /// peer itself.
    pub fn join(&self, room_id: &RoomId, peer_id: PeerId) -> Vec<PeerId> {
        let mut room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            RoomState {
                peers: Vec::new(),
                last_chat_ts: 0,
            }
        });

        let snapshot = room.peers.clone();
        room.peers.push(peer_id);
        drop(room);

        self.membership.insert(peer_id, room_id.clone());
        info!("[Room {}] Peer {} joined", room_id, peer_id);
        snapshot
    }

    /// Remove a peer from whatever room it is in. Returns the room and the
    /// remaining members, or `None` if the peer was not in a room. An
    /// emptied room is deleted.
    pub fn leave(&self, peer_id: &PeerId) -> Option<(RoomId, Vec<PeerId>)> {
        let (_, room_id) = self.membership.remove(peer_id)?;

        let remaining = {
            let mut room = self.rooms.get_mut(&room_id)?;
            room.peers.retain(|p| p != peer_id);
            room.peers.clone()
        };

        info!(
            "[Room {}] Peer {} removed, {} peer(s) remaining",
            room_id,
            peer_id,
            remaining.len()
        );

        if remaining.is_empty() {
            self.rooms.remove_if(&room_id, |_, state| state.peers.is_empty());
            info!("[Room {}] Empty, removed", room_id);
        }

        Some((room_id, remaining))
    }

    pub fn room_of(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.membership.get(peer_id).map(|r| r.clone())
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room_id)
            .map(|r| r.peers.clone())
            .unwrap_or_default()
    }

    pub fn is_member(&self, room_id: &RoomId, peer_id: &PeerId) -> bool {
        self.rooms
            .get(room_id)
            .map(|r| r.peers.contains(peer_id))
            .unwrap_or(false)
    }

    /// Issue a chat timestamp and run delivery in one critical section on
    /// the room entry. Timestamps are wall-clock millis, clamped so
    /// consecutive chats within one room strictly increase; delivering
    /// under the same lock means every member observes chats in timestamp
    /// order. Returns `false` if the room no longer exists.
    pub fn deliver_chat<F>(&self, room_id: &RoomId, deliver: F) -> bool
    where
        F: FnOnce(i64, &[PeerId]),
    {
        let Some(mut room) = self.rooms.get_mut(room_id) else {
            return false;
        };
        let now = chrono::Utc::now().timestamp_millis();
        let ts = now.max(room.last_chat_ts + 1);
        room.last_chat_ts = ts;
        deliver(ts, &room.peers);
        true
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
