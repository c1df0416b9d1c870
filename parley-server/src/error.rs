use thiserror::Error;

/// Protocol-level faults answered with an explicit `error` reply. None of
/// these are fatal to the connection or the server process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Not in a room")]
    NotInRoom,
    #[error("roomId is required")]
    RoomIdRequired,
    #[error("Chat message is required")]
    EmptyChat,
}
