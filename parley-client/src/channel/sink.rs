use async_trait::async_trait;
use parley_core::ClientSignal;

/// Outbound half of the signaling path. Sessions and the coordinator send
/// through this seam so tests can capture traffic without a socket.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, signal: ClientSignal);
}
