use parley_core::ServerSignal;
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_disconnect_notifies_and_prunes() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let b = connect_peer(&state);
    let mut c = connect_peer(&state);

    a.join(&state, "demo7k2x1p").unwrap();
    b.join(&state, "demo7k2x1p").unwrap();
    c.join(&state, "demo7k2x1p").unwrap();
    a.drain();
    c.drain();

    // B's channel drops without a leave message.
    b.disconnect(&state);

    for peer in [&mut a, &mut c] {
        let left: Vec<_> = peer
            .drain()
            .into_iter()
            .filter_map(|s| match s {
                ServerSignal::PeerLeft { peer_id } => Some(peer_id),
                _ => None,
            })
            .collect();
        assert_eq!(left, vec![b.id]);
    }

    assert_eq!(
        state.router.registry().members(&"demo7k2x1p".into()),
        vec![a.id, c.id]
    );
}
