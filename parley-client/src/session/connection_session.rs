use std::sync::Arc;

use parley_core::{CandidateInit, PeerId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::channel::SignalSink;
use crate::event::MeetingEvent;
use crate::transport::{
    ConnectionHealth, NegotiationBackend, SdpKind, TransportError, TransportEvent,
};

use super::candidate_buffer::CandidateBuffer;
use super::roles::Role;

/// Inputs routed to a session by the coordinator.
#[derive(Debug)]
pub enum SessionCommand {
    RemoteOffer { sdp: String },
    RemoteAnswer { sdp: String },
    RemoteCandidate { candidate: CandidateInit },
    Negotiate,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    New,
    HaveLocalOffer,
    HaveRemoteOffer,
    Stable,
    Closed,
}

/// Negotiation state machine for one remote peer.
///
/// Commands arrive from the coordinator, transport events from the
/// negotiation primitive; both feed the same sequential loop so state
/// never needs a lock. A failed exchange rolls the machine back to its
/// last settled state instead of tearing the session down.
pub struct ConnectionSession {
    remote_peer: PeerId,
    role: Role,
    state: SessionState,
    backend: Box<dyn NegotiationBackend>,
    sink: Arc<dyn SignalSink>,
    events: mpsc::UnboundedSender<MeetingEvent>,
    buffer: CandidateBuffer,
    remote_description_set: bool,
    negotiation_in_flight: bool,
    established: bool,
}

impl ConnectionSession {
    pub fn new(
        remote_peer: PeerId,
        role: Role,
        backend: Box<dyn NegotiationBackend>,
        sink: Arc<dyn SignalSink>,
        events: mpsc::UnboundedSender<MeetingEvent>,
    ) -> Self {
        Self {
            remote_peer,
            role,
            state: SessionState::New,
            backend,
            sink,
            events,
            buffer: CandidateBuffer::new(),
            remote_description_set: false,
            negotiation_in_flight: false,
            established: false,
        }
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut transport: mpsc::Receiver<TransportEvent>,
    ) {
        if self.role == Role::Initiator {
            self.start_offer().await;
        }

        // A closed transport stream only means no more events; the session
        // ends on an explicit close or remote departure, nothing else.
        let mut transport_open = true;
        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::Close) | None => break,
                        Some(command) => self.handle_command(command).await,
                    }
                }
                event = transport.recv(), if transport_open => {
                    match event {
                        Some(event) => self.handle_transport(event).await,
                        None => transport_open = false,
                    }
                }
            }
        }

        self.backend.close().await;
        self.state = SessionState::Closed;
        debug!(peer = %self.remote_peer, "session closed");
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::RemoteOffer { sdp } => {
                if let Err(err) = self.accept_offer(&sdp).await {
                    warn!(peer = %self.remote_peer, error = %err, "offer exchange failed");
                    self.rollback();
                }
            }
            SessionCommand::RemoteAnswer { sdp } => {
                if self.state != SessionState::HaveLocalOffer {
                    debug!(peer = %self.remote_peer, state = ?self.state, "ignoring unexpected answer");
                    return;
                }
                if let Err(err) = self.accept_answer(&sdp).await {
                    warn!(peer = %self.remote_peer, error = %err, "answer apply failed");
                    self.rollback();
                }
            }
            SessionCommand::RemoteCandidate { candidate } => {
                self.accept_candidate(candidate).await;
            }
            SessionCommand::Negotiate => self.start_offer().await,
            SessionCommand::Close => {}
        }
    }

    async fn handle_transport(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGathered(candidate) => {
                self.sink
                    .send(parley_core::ClientSignal::IceCandidate {
                        target_peer_id: self.remote_peer,
                        candidate,
                    })
                    .await;
            }
            TransportEvent::RemoteTrack(track) => {
                let _ = self.events.send(MeetingEvent::RemoteTrack {
                    peer_id: self.remote_peer,
                    track,
                });
            }
            TransportEvent::Health(health) => self.observe_health(health),
            TransportEvent::NegotiationNeeded => {
                // Before the first exchange completes this fires from the
                // initial track setup; the role already decides who offers.
                if self.established {
                    self.start_offer().await;
                }
            }
        }
    }

    async fn start_offer(&mut self) {
        if self.negotiation_in_flight {
            return;
        }
        self.negotiation_in_flight = true;
        if let Err(err) = self.send_offer().await {
            warn!(peer = %self.remote_peer, error = %err, "offer creation failed");
            self.rollback();
        }
    }

    async fn send_offer(&mut self) -> Result<(), TransportError> {
        let sdp = self.backend.produce_offer().await?;
        self.backend.apply_local(SdpKind::Offer, &sdp).await?;
        self.state = SessionState::HaveLocalOffer;
        self.sink
            .send(parley_core::ClientSignal::Offer {
                target_peer_id: self.remote_peer,
                sdp,
            })
            .await;
        Ok(())
    }

    async fn accept_offer(&mut self, sdp: &str) -> Result<(), TransportError> {
        self.backend.apply_remote(SdpKind::Offer, sdp).await?;
        self.remote_description_set = true;
        self.state = SessionState::HaveRemoteOffer;
        self.flush_candidates().await;

        let answer = self.backend.produce_answer().await?;
        self.backend.apply_local(SdpKind::Answer, &answer).await?;
        self.sink
            .send(parley_core::ClientSignal::Answer {
                target_peer_id: self.remote_peer,
                sdp: answer,
            })
            .await;
        self.settle();
        Ok(())
    }

    async fn accept_answer(&mut self, sdp: &str) -> Result<(), TransportError> {
        self.backend.apply_remote(SdpKind::Answer, sdp).await?;
        self.remote_description_set = true;
        self.flush_candidates().await;
        self.settle();
        Ok(())
    }

    async fn accept_candidate(&mut self, candidate: CandidateInit) {
        if !self.remote_description_set {
            if let Some(evicted) = self.buffer.push(candidate) {
                warn!(peer = %self.remote_peer, dropped = %evicted.candidate, "candidate buffer full");
            }
            return;
        }
        // A bad candidate only narrows the path choices, it never ends
        // the session.
        if let Err(err) = self.backend.add_remote_candidate(&candidate).await {
            warn!(peer = %self.remote_peer, error = %err, "remote candidate rejected");
        }
    }

    async fn flush_candidates(&mut self) {
        while let Some(candidate) = self.buffer.pop() {
            if let Err(err) = self.backend.add_remote_candidate(&candidate).await {
                warn!(peer = %self.remote_peer, error = %err, "buffered candidate rejected");
            }
        }
    }

    fn settle(&mut self) {
        self.state = SessionState::Stable;
        self.negotiation_in_flight = false;
        if !self.established {
            self.established = true;
            info!(peer = %self.remote_peer, "session established");
            let _ = self.events.send(MeetingEvent::SessionEstablished {
                peer_id: self.remote_peer,
            });
        }
    }

    fn rollback(&mut self) {
        self.state = if self.established {
            SessionState::Stable
        } else {
            SessionState::New
        };
        self.negotiation_in_flight = false;
    }

    fn observe_health(&self, health: ConnectionHealth) {
        match health {
            ConnectionHealth::Failed | ConnectionHealth::Disconnected => {
                // Surfaced for the logs only. Recovery is left to ICE; the
                // session ends when the peer leaves the room.
                warn!(peer = %self.remote_peer, ?health, "transport degraded");
            }
            _ => debug!(peer = %self.remote_peer, ?health, "transport health"),
        }
    }
}
