use parley_core::{ClientSignal, PeerId};
use parley_server::{AppState, ProtocolError};

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_pre_join_rejected() {
    init_tracing();
    let state = AppState::new();
    let a = connect_peer(&state);

    let err = a
        .send(
            &state,
            ClientSignal::Offer {
                target_peer_id: PeerId::new(),
                sdp: "v=0".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err, ProtocolError::NotInRoom);
    assert_eq!(err.to_string(), "Not in a room");

    let err = a
        .send(
            &state,
            ClientSignal::Chat {
                message: "hi".into(),
            },
        )
        .unwrap_err();
    assert_eq!(err, ProtocolError::NotInRoom);

    // An empty room code is rejected up front.
    let err = a.join(&state, "").unwrap_err();
    assert_eq!(err.to_string(), "roomId is required");
}
