mod backend;
mod rtc;

pub use backend::{
    ConnectionHealth, MediaKind, NegotiationBackend, NegotiationFactory, RemoteTrack, SdpKind,
    TransportError, TransportEvent,
};
pub use rtc::{RtcBackend, RtcConfig, RtcFactory};
