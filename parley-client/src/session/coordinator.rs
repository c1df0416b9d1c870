use std::collections::HashMap;
use std::sync::Arc;

use parley_core::{PeerId, ServerSignal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::channel::{ChannelEvent, SignalSink};
use crate::event::MeetingEvent;
use crate::media::{LocalTrack, MediaPrefs, MediaSource};
use crate::transport::NegotiationFactory;

use super::connection_session::{ConnectionSession, SessionCommand};
use super::roles::{Role, assign_roles};

struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
}

/// Owns one `ConnectionSession` per remote peer and routes every inbound
/// server signal to the right one. Membership signals drive the session
/// set; everything else is surfaced to the application as `MeetingEvent`s.
pub struct SessionCoordinator {
    local_peer: Option<PeerId>,
    sessions: HashMap<PeerId, SessionHandle>,
    factory: Arc<dyn NegotiationFactory>,
    media: Arc<dyn MediaSource>,
    prefs: MediaPrefs,
    local_tracks: Vec<LocalTrack>,
    sink: Arc<dyn SignalSink>,
    events: mpsc::UnboundedSender<MeetingEvent>,
}

impl SessionCoordinator {
    pub fn new(
        factory: Arc<dyn NegotiationFactory>,
        media: Arc<dyn MediaSource>,
        prefs: MediaPrefs,
        sink: Arc<dyn SignalSink>,
    ) -> (Self, mpsc::UnboundedReceiver<MeetingEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            local_peer: None,
            sessions: HashMap::new(),
            factory,
            media,
            prefs,
            local_tracks: Vec::new(),
            sink,
            events: event_tx,
        };
        (coordinator, event_rx)
    }

    /// Consumes control-channel events until the channel ends or the user
    /// leaves. Media is acquired up front; a denied capture only means the
    /// sessions carry no local tracks.
    pub async fn run(mut self, mut channel: mpsc::UnboundedReceiver<ChannelEvent>) {
        match self.media.acquire(self.prefs).await {
            Ok(tracks) => self.local_tracks = tracks,
            Err(err) => warn!(error = %err, "media unavailable, continuing without local tracks"),
        }

        while let Some(event) = channel.recv().await {
            match event {
                ChannelEvent::Connected => {}
                ChannelEvent::Signal(signal) => self.handle_signal(signal).await,
                ChannelEvent::Disconnected { intentional: true } => {
                    self.close_all_sessions();
                    break;
                }
                ChannelEvent::Disconnected { intentional: false } => {
                    // Sessions are left running across the gap; the welcome
                    // after reconnect decides whether they are still valid.
                    debug!("control channel lost, awaiting reconnect");
                }
            }
        }
        self.close_all_sessions();
    }

    async fn handle_signal(&mut self, signal: ServerSignal) {
        match signal {
            ServerSignal::Welcome { peer_id } => {
                if let Some(previous) = self.local_peer
                    && previous != peer_id
                {
                    // A fresh identity means every existing session targets
                    // a peer id the server no longer knows.
                    info!(old = %previous, new = %peer_id, "identity changed, resetting sessions");
                    self.close_all_sessions();
                }
                self.local_peer = Some(peer_id);
            }
            ServerSignal::RoomJoined {
                room_id,
                peer_id,
                peers,
            } => {
                self.local_peer = Some(peer_id);
                for (peer, role) in assign_roles(&peers) {
                    self.ensure_session(peer, role).await;
                }
                let _ = self.events.send(MeetingEvent::RoomJoined { room_id, peers });
            }
            ServerSignal::PeerJoined { peer_id } => {
                // The newcomer offers toward us; the responder session is
                // created when that offer arrives.
                let _ = self.events.send(MeetingEvent::PeerJoined { peer_id });
            }
            ServerSignal::PeerLeft { peer_id } => {
                self.close_session(peer_id);
                let _ = self.events.send(MeetingEvent::PeerLeft { peer_id });
            }
            ServerSignal::Offer { peer_id, sdp } => {
                if let Some(session) = self.ensure_session(peer_id, Role::Responder).await {
                    let _ = session.commands.send(SessionCommand::RemoteOffer { sdp });
                }
            }
            ServerSignal::Answer { peer_id, sdp } => match self.sessions.get(&peer_id) {
                Some(session) => {
                    let _ = session.commands.send(SessionCommand::RemoteAnswer { sdp });
                }
                None => debug!(peer = %peer_id, "answer for unknown session dropped"),
            },
            ServerSignal::IceCandidate { peer_id, candidate } => match self.sessions.get(&peer_id) {
                Some(session) => {
                    let _ = session
                        .commands
                        .send(SessionCommand::RemoteCandidate { candidate });
                }
                None => debug!(peer = %peer_id, "candidate for unknown session dropped"),
            },
            ServerSignal::Left { room_id } => {
                self.close_all_sessions();
                let _ = self.events.send(MeetingEvent::Left { room_id });
            }
            ServerSignal::Chat {
                peer_id,
                message,
                timestamp,
            } => {
                let _ = self.events.send(MeetingEvent::Chat {
                    peer_id,
                    message,
                    timestamp,
                });
            }
            ServerSignal::Error { message } => {
                warn!(%message, "server reported an error");
                let _ = self.events.send(MeetingEvent::ServerError { message });
            }
        }
    }

    async fn ensure_session(&mut self, peer: PeerId, role: Role) -> Option<&SessionHandle> {
        if !self.sessions.contains_key(&peer) {
            let (transport_tx, transport_rx) = mpsc::channel(32);
            let backend = match self.factory.create(&self.local_tracks, transport_tx).await {
                Ok(backend) => backend,
                Err(err) => {
                    warn!(peer = %peer, error = %err, "failed to create session transport");
                    return None;
                }
            };

            let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
            let session = ConnectionSession::new(
                peer,
                role,
                backend,
                Arc::clone(&self.sink),
                self.events.clone(),
            );
            tokio::spawn(session.run(cmd_rx, transport_rx));
            debug!(peer = %peer, ?role, "session started");
            self.sessions.insert(peer, SessionHandle { commands: cmd_tx });
        }
        self.sessions.get(&peer)
    }

    fn close_session(&mut self, peer: PeerId) {
        if let Some(session) = self.sessions.remove(&peer) {
            let _ = session.commands.send(SessionCommand::Close);
        }
    }

    fn close_all_sessions(&mut self) {
        for (_, session) in self.sessions.drain() {
            let _ = session.commands.send(SessionCommand::Close);
        }
    }
}
