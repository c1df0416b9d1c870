use parley_core::{CandidateInit, ClientSignal, ServerSignal};
use parley_server::AppState;

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_offer_relayed_with_sender_id() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let mut b = connect_peer(&state);
    a.join(&state, "r1").unwrap();
    b.join(&state, "r1").unwrap();
    a.drain();
    b.drain();

    b.send(
        &state,
        ClientSignal::Offer {
            target_peer_id: a.id,
            sdp: "v=0 offer-from-b".into(),
        },
    )
    .unwrap();

    let signals = a.drain();
    assert_eq!(
        signals,
        vec![ServerSignal::Offer {
            peer_id: b.id,
            sdp: "v=0 offer-from-b".into(),
        }]
    );

    a.send(
        &state,
        ClientSignal::Answer {
            target_peer_id: b.id,
            sdp: "v=0 answer-from-a".into(),
        },
    )
    .unwrap();
    a.send(
        &state,
        ClientSignal::IceCandidate {
            target_peer_id: b.id,
            candidate: CandidateInit {
                candidate: "candidate:1 1 udp 1 192.0.2.7 9 typ host".into(),
                sdp_mid: Some("0".into()),
                sdp_mline_index: Some(0),
            },
        },
    )
    .unwrap();

    let signals = b.drain();
    assert!(
        matches!(&signals[0], ServerSignal::Answer { peer_id, .. } if *peer_id == a.id)
    );
    assert!(
        matches!(&signals[1], ServerSignal::IceCandidate { peer_id, .. } if *peer_id == a.id)
    );
}
