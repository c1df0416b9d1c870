use parley_core::ServerSignal;
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_rejoin_moves_peer() {
    init_tracing();
    let state = AppState::new();

    let a = connect_peer(&state);
    let mut b = connect_peer(&state);
    a.join(&state, "old-room").unwrap();
    b.join(&state, "old-room").unwrap();
    b.drain();

    // Joining a second room implicitly leaves the first.
    a.join(&state, "new-room").unwrap();

    assert!(
        b.drain()
            .iter()
            .any(|s| matches!(s, ServerSignal::PeerLeft { peer_id } if *peer_id == a.id))
    );
    assert_eq!(state.router.registry().members(&"old-room".into()), vec![b.id]);
    assert_eq!(state.router.registry().members(&"new-room".into()), vec![a.id]);
}
