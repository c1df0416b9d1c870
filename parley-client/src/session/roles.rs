use parley_core::PeerId;

/// Which side of the offer/answer exchange this session drives.
///
/// The joining peer offers toward everyone already in the room, and peers
/// that arrive later offer toward it. Deriving the role from join order
/// means no two peers ever offer to each other at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Sends the offer as soon as the session starts.
    Initiator,
    /// Waits for the remote offer before doing anything.
    Responder,
}

/// Assigns the local role toward every peer in the join snapshot. The
/// snapshot only ever contains peers that joined earlier, so the local
/// peer initiates toward all of them.
pub fn assign_roles(snapshot: &[PeerId]) -> Vec<(PeerId, Role)> {
    snapshot
        .iter()
        .map(|peer| (*peer, Role::Initiator))
        .collect()
}
