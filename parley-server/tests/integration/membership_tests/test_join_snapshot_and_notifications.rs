use parley_core::ServerSignal;
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_join_snapshot_and_notifications() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let mut b = connect_peer(&state);
    let mut c = connect_peer(&state);

    a.join(&state, "demo7k2x1p").expect("A join failed");
    b.join(&state, "demo7k2x1p").expect("B join failed");
    c.join(&state, "demo7k2x1p").expect("C join failed");

    // C's snapshot is exactly the room before its own join, in join order.
    let (_, snapshot) = c.expect_room_joined();
    assert_eq!(snapshot, vec![a.id, b.id]);

    // A saw B and C arrive; B saw only C; neither snapshot contains self.
    let a_joined: Vec<_> = a
        .drain()
        .into_iter()
        .filter_map(|s| match s {
            ServerSignal::PeerJoined { peer_id } => Some(peer_id),
            _ => None,
        })
        .collect();
    assert_eq!(a_joined, vec![b.id, c.id]);

    let (_, b_snapshot) = b.expect_room_joined();
    assert_eq!(b_snapshot, vec![a.id]);
    assert!(!b_snapshot.contains(&b.id));

    assert_eq!(state.router.registry().members(&"demo7k2x1p".into()).len(), 3);
}
