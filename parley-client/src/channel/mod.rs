mod control_channel;
mod sink;

pub use control_channel::{ChannelEvent, ControlChannel};
pub use sink::SignalSink;
