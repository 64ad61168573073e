use serde_json::json;
use switchboard_core::ServerMessage;

use crate::integration::{create_test_router, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_relay_delivers_verbatim() {
    init_tracing();

    let router = create_test_router();
    let mut alice = TestPeer::connect(&router);
    let mut bob = TestPeer::connect(&router);

    let (session_id, alice_id) = alice.create(&router).await;
    let bob_id = bob.join(&router, &session_id).await;
    alice.drain();

    // Not a valid negotiation payload at all: the router must not care.
    let payload = json!({ "type": "offer", "sdp": "v=0\r\n", "extra": [1, { "nested": true }] });
    alice.relay(&router, bob_id, payload.clone()).await;

    assert_eq!(
        bob.next(),
        ServerMessage::Signal {
            sender_participant_id: alice_id,
            payload,
        }
    );
    alice.assert_silent();

    bob.relay(&router, alice_id, json!("opaque string")).await;
    assert_eq!(
        alice.next(),
        ServerMessage::Signal {
            sender_participant_id: bob_id,
            payload: json!("opaque string"),
        }
    );
}
