use parley_core::{ClientSignal, RoomId, ServerSignal};
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_leave_ack_and_room_cleanup() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let mut b = connect_peer(&state);
    a.join(&state, "r1").unwrap();
    b.join(&state, "r1").unwrap();
    a.drain();
    b.drain();

    a.send(&state, ClientSignal::Leave).unwrap();

    let acks: Vec<_> = a
        .drain()
        .into_iter()
        .filter(|s| matches!(s, ServerSignal::Left { room_id } if *room_id == RoomId::from("r1")))
        .collect();
    assert_eq!(acks.len(), 1, "Expected exactly one leave ack");

    assert!(
        b.drain()
            .iter()
            .any(|s| matches!(s, ServerSignal::PeerLeft { peer_id } if *peer_id == a.id))
    );

    // Last member out deletes the room.
    b.send(&state, ClientSignal::Leave).unwrap();
    assert_eq!(state.router.registry().room_count(), 0);

    // A second leave with no room is silently ignored.
    a.send(&state, ClientSignal::Leave).unwrap();
    assert!(a.drain().is_empty());
}
