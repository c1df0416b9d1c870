use parley_core::{ClientSignal, ServerSignal};
use parley_server::{AppState, ProtocolError};

use crate::integration::init_tracing;
use crate::utils::connect_peer;

#[tokio::test]
async fn test_chat_broadcast() {
    init_tracing();
    let state = AppState::new();

    let mut a = connect_peer(&state);
    let mut b = connect_peer(&state);
    a.join(&state, "r1").unwrap();
    b.join(&state, "r1").unwrap();
    a.drain();
    b.drain();

    a.send(
        &state,
        ClientSignal::Chat {
            message: "first".into(),
        },
    )
    .unwrap();
    b.send(
        &state,
        ClientSignal::Chat {
            message: "second".into(),
        },
    )
    .unwrap();

    // Both members, sender included, receive both messages with the
    // server-assigned timestamps strictly increasing within the room.
    let (a_id, b_id) = (a.id, b.id);
    for peer in [&mut a, &mut b] {
        let chats: Vec<_> = peer
            .drain()
            .into_iter()
            .filter_map(|s| match s {
                ServerSignal::Chat {
                    peer_id,
                    message,
                    timestamp,
                } => Some((peer_id, message, timestamp)),
                _ => None,
            })
            .collect();

        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].0, a_id);
        assert_eq!(chats[0].1, "first");
        assert_eq!(chats[1].0, b_id);
        assert!(chats[0].2 < chats[1].2);
    }

    let err = a
        .send(&state, ClientSignal::Chat { message: "".into() })
        .unwrap_err();
    assert_eq!(err, ProtocolError::EmptyChat);
}
