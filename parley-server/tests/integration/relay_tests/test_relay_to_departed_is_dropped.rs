use parley_core::ClientSignal;
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_relay_to_departed_is_dropped() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let b = connect_peer(&state);
    a.join(&state, "r1").unwrap();
    b.join(&state, "r1").unwrap();
    b.disconnect(&state);
    a.drain();

    // Relaying to a peer that already left is not an error and produces
    // no reply; the peer-left notification already reconciled A.
    a.send(
        &state,
        ClientSignal::Offer {
            target_peer_id: b.id,
            sdp: "v=0".into(),
        },
    )
    .expect("Relay miss must not be an error");

    assert!(a.drain().is_empty());
}
