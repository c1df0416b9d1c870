use crate::error::ProtocolError;
use crate::room::RoomRegistry;
use crate::signaling::PeerDirectory;
use parley_core::{ClientSignal, PeerId, RoomId, ServerSignal};
use std::sync::Arc;
use tracing::{debug, info};

/// Routes decoded client signals: membership changes fan out notifications,
/// targeted messages are relayed with the sender's id attached, chat is
/// broadcast room-wide. Each message is handled to completion before the
/// next one from the same connection, so registry mutations for one message
/// never interleave with another's.
#[derive(Clone)]
pub struct RelayRouter {
    registry: Arc<RoomRegistry>,
    directory: Arc<PeerDirectory>,
}

impl RelayRouter {
    pub fn new(registry: Arc<RoomRegistry>, directory: Arc<PeerDirectory>) -> Self {
        Self {
            registry,
            directory,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Handle one inbound signal. An `Err` is answered with an `error`
    /// reply by the caller and is never fatal.
    pub fn handle(&self, from: PeerId, signal: ClientSignal) -> Result<(), ProtocolError> {
        match signal {
            ClientSignal::Join { room_id } => self.handle_join(from, room_id),

            ClientSignal::Offer {
                target_peer_id,
                sdp,
            } => self.relay(
                from,
                target_peer_id,
                ServerSignal::Offer { peer_id: from, sdp },
            ),

            ClientSignal::Answer {
                target_peer_id,
                sdp,
            } => self.relay(
                from,
                target_peer_id,
                ServerSignal::Answer { peer_id: from, sdp },
            ),

            ClientSignal::IceCandidate {
                target_peer_id,
                candidate,
            } => self.relay(
                from,
                target_peer_id,
                ServerSignal::IceCandidate {
                    peer_id: from,
                    candidate,
                },
            ),

            ClientSignal::Leave => {
                if let Some((room_id, remaining)) = self.registry.leave(&from) {
                    self.notify_departure(&from, &remaining);
                    self.directory.send(&from, ServerSignal::Left { room_id });
                }
                Ok(())
            }

            ClientSignal::Chat { message } => self.handle_chat(from, message),
        }
    }

    /// Socket closed without an explicit leave: same as leave, minus the
    /// acknowledgment nobody is listening for.
    pub fn peer_disconnected(&self, peer_id: PeerId) {
        if let Some((room_id, remaining)) = self.registry.leave(&peer_id) {
            info!("[Room {}] Peer {} disconnected", room_id, peer_id);
            self.notify_departure(&peer_id, &remaining);
        }
    }

    fn handle_join(&self, from: PeerId, room_id: RoomId) -> Result<(), ProtocolError> {
        if room_id.is_empty() {
            return Err(ProtocolError::RoomIdRequired);
        }

        // Joining while already in a room moves the peer.
        if let Some((_, remaining)) = self.registry.leave(&from) {
            self.notify_departure(&from, &remaining);
        }

        let snapshot = self.registry.join(&room_id, from);

        self.directory.send(
            &from,
            ServerSignal::RoomJoined {
                room_id,
                peer_id: from,
                peers: snapshot.clone(),
            },
        );

        for peer in &snapshot {
            self.directory
                .send(peer, ServerSignal::PeerJoined { peer_id: from });
        }

        Ok(())
    }

    fn handle_chat(&self, from: PeerId, message: String) -> Result<(), ProtocolError> {
        let room_id = self
            .registry
            .room_of(&from)
            .ok_or(ProtocolError::NotInRoom)?;

        if message.is_empty() {
            return Err(ProtocolError::EmptyChat);
        }

        // Timestamp issue and fan-out share one room-level critical
        // section, so members observe chats in timestamp order. Broadcast
        // includes the sender.
        self.registry.deliver_chat(&room_id, |timestamp, members| {
            for peer in members {
                self.directory.send(
                    peer,
                    ServerSignal::Chat {
                        peer_id: from,
                        message: message.clone(),
                        timestamp,
                    },
                );
            }
        });

        Ok(())
    }

    /// Forward a message to a peer in the sender's room. A target that has
    /// already left is silently dropped; the departure notification
    /// reconciles the sender's view.
    fn relay(
        &self,
        from: PeerId,
        target: PeerId,
        msg: ServerSignal,
    ) -> Result<(), ProtocolError> {
        let room_id = self
            .registry
            .room_of(&from)
            .ok_or(ProtocolError::NotInRoom)?;

        if self.registry.is_member(&room_id, &target) {
            self.directory.send(&target, msg);
        } else {
            debug!(
                "[Room {}] Dropping relay from {} to departed peer {}",
                room_id, from, target
            );
        }

        Ok(())
    }

    fn notify_departure(&self, departed: &PeerId, remaining: &[PeerId]) {
        for peer in remaining {
            self.directory
                .send(peer, ServerSignal::PeerLeft { peer_id: *departed });
        }
    }
}
