use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parley_core::{ClientSignal, RoomId, ServerSignal};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use super::sink::SignalSink;

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Lifecycle notifications delivered alongside inbound signals.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    Connected,
    Signal(ServerSignal),
    Disconnected { intentional: bool },
}

/// Persistent signaling link. Joins the room on every (re)connect and
/// schedules a reconnect after each close the client did not ask for.
pub struct ControlChannel {
    outbound: mpsc::UnboundedSender<ClientSignal>,
    leaving: watch::Sender<bool>,
}

impl ControlChannel {
    pub fn connect(url: String, room_id: RoomId) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (leaving_tx, leaving_rx) = watch::channel(false);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(channel_task(url, room_id, outbound_rx, leaving_rx, event_tx));

        let channel = Self {
            outbound: outbound_tx,
            leaving: leaving_tx,
        };
        (channel, event_rx)
    }

    /// Marks the shutdown as intentional before the socket closes, so the
    /// reconnect logic stays quiet.
    pub async fn leave(&self) {
        let _ = self.leaving.send(true);
        let _ = self.outbound.send(ClientSignal::Leave);
    }
}

#[async_trait]
impl SignalSink for ControlChannel {
    async fn send(&self, signal: ClientSignal) {
        // Sends while the link is down are dropped by the channel task.
        if self.outbound.send(signal).is_err() {
            debug!("control channel task gone, dropping outbound signal");
        }
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn channel_task(
    url: String,
    room_id: RoomId,
    mut outbound: mpsc::UnboundedReceiver<ClientSignal>,
    mut leaving: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    loop {
        match connect_async(&url).await {
            Ok((socket, _)) => {
                info!(%room_id, "control channel connected");
                let _ = events.send(ChannelEvent::Connected);
                run_socket(socket, &room_id, &mut outbound, &leaving, &events).await;
            }
            Err(err) => {
                warn!(error = %err, "control channel connect failed");
            }
        }

        if *leaving.borrow() {
            let _ = events.send(ChannelEvent::Disconnected { intentional: true });
            break;
        }
        let _ = events.send(ChannelEvent::Disconnected { intentional: false });

        // One delayed reconnect per close. Outbound traffic queued while the
        // link is down is discarded.
        let delay = tokio::time::sleep(RECONNECT_DELAY);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => break,
                changed = leaving.changed() => {
                    if changed.is_err() || *leaving.borrow() {
                        return;
                    }
                }
                discarded = outbound.recv() => {
                    match discarded {
                        Some(_) => debug!("link down, discarding outbound signal"),
                        None => return,
                    }
                }
            }
        }
    }
}

async fn run_socket(
    mut socket: WsStream,
    room_id: &RoomId,
    outbound: &mut mpsc::UnboundedReceiver<ClientSignal>,
    leaving: &watch::Receiver<bool>,
    events: &mpsc::UnboundedSender<ChannelEvent>,
) {
    let join = ClientSignal::Join {
        room_id: room_id.clone(),
    };
    if send_signal(&mut socket, &join).await.is_err() {
        return;
    }

    // After a leave is sent the socket stays open until the server's
    // `left` acknowledgment arrives (or the server closes first).
    let mut awaiting_left_ack = false;
    loop {
        tokio::select! {
            signal = outbound.recv() => {
                let Some(signal) = signal else { return };
                let is_leave = matches!(signal, ClientSignal::Leave);
                if send_signal(&mut socket, &signal).await.is_err() {
                    return;
                }
                if is_leave && *leaving.borrow() {
                    awaiting_left_ack = true;
                }
            }
            message = socket.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => match ServerSignal::decode(&text) {
                        Ok(signal) => {
                            let acked = matches!(signal, ServerSignal::Left { .. });
                            let _ = events.send(ChannelEvent::Signal(signal));
                            if acked && awaiting_left_ack {
                                let _ = socket.close(None).await;
                                return;
                            }
                        }
                        Err(err) => warn!(error = %err, "undecodable server signal"),
                    },
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(error = %err, "control channel read error");
                        return;
                    }
                }
            }
        }
    }
}

async fn send_signal(
    socket: &mut WsStream,
    signal: &ClientSignal,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let text = match serde_json::to_string(signal) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "failed to serialize outbound signal");
            return Ok(());
        }
    };
    socket.send(Message::Text(text)).await.inspect_err(|err| {
        warn!(error = %err, "control channel write error");
    })
}
