use parley_core::{ClientSignal, ServerSignal};
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let mut b = connect_peer(&state);
    let mut outsider = connect_peer(&state);

    a.join(&state, "r1").unwrap();
    b.join(&state, "r1").unwrap();
    outsider.join(&state, "r2").unwrap();
    outsider.drain();

    // Cross-room relay targets are not members and are dropped.
    a.send(
        &state,
        ClientSignal::Offer {
            target_peer_id: outsider.id,
            sdp: "v=0".into(),
        },
    )
    .unwrap();
    assert!(outsider.drain().is_empty());

    // Membership events and chat stay within the room.
    b.send(&state, ClientSignal::Leave).unwrap();
    a.send(
        &state,
        ClientSignal::Chat {
            message: "r1 only".into(),
        },
    )
    .unwrap();

    assert!(outsider.drain().is_empty());
    assert!(
        a.drain()
            .iter()
            .any(|s| matches!(s, ServerSignal::Chat { .. }))
    );
}
