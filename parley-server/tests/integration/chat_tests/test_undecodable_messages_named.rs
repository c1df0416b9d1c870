use parley_core::ClientSignal;

use crate::integration::init_tracing;

// The ws layer answers undecodable input with an `error` reply built from
// the decode error; these assertions pin the reply texts.
#[tokio::test]
async fn test_undecodable_messages_named() {
    init_tracing();

    let err = ClientSignal::decode(r#"{"type":"subscribe"}"#).unwrap_err();
    assert_eq!(err.to_string(), "Unknown message type: subscribe");

    let err = ClientSignal::decode("{not json").unwrap_err();
    assert_eq!(err.to_string(), "Invalid JSON");

    let err = ClientSignal::decode(r#"{"roomId":"r1"}"#).unwrap_err();
    assert_eq!(err.to_string(), "Message has no type");
}
