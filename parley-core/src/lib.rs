pub mod model;

pub use model::{
    CandidateInit, ClientSignal, DecodeError, IceServerConfig, PeerId, RoomId, ServerSignal,
};
