mod candidate_buffer;
mod connection_session;
mod coordinator;
mod roles;

pub use candidate_buffer::CandidateBuffer;
pub use connection_session::{ConnectionSession, SessionCommand, SessionState};
pub use coordinator::SessionCoordinator;
pub use roles::{Role, assign_roles};
