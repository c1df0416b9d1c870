pub mod channel;
pub mod event;
pub mod media;
pub mod session;
pub mod transport;

pub use channel::{ChannelEvent, ControlChannel, SignalSink};
pub use event::MeetingEvent;
pub use media::{MediaPrefs, MediaSource, NullMediaSource};
pub use session::{Role, SessionCoordinator, SessionState, assign_roles};
pub use transport::{
    NegotiationBackend, NegotiationFactory, RtcConfig, RtcFactory, TransportError, TransportEvent,
};
