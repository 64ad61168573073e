use serde_json::json;
use switchboard_core::ParticipantId;

use crate::integration::{create_test_router, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_relay_to_departed_participant_is_dropped() {
    init_tracing();

    let router = create_test_router();
    let mut alice = TestPeer::connect(&router);
    let mut bob = TestPeer::connect(&router);

    let (session_id, _) = alice.create(&router).await;
    let bob_id = bob.join(&router, &session_id).await;
    router.handle_disconnect(bob.address.id()).await;
    alice.drain();

    alice.relay(&router, bob_id, json!({ "type": "candidate" })).await;

    alice.assert_silent();
    bob.assert_silent();
}

#[tokio::test]
async fn test_relay_to_unknown_participant_is_dropped() {
    init_tracing();

    let router = create_test_router();
    let mut alice = TestPeer::connect(&router);
    alice.create(&router).await;

    alice.relay(&router, ParticipantId::new(), json!({})).await;

    alice.assert_silent();
}

#[tokio::test]
async fn test_relay_from_unbound_connection_is_dropped() {
    init_tracing();

    let router = create_test_router();
    let mut alice = TestPeer::connect(&router);
    let (_, alice_id) = alice.create(&router).await;

    let mut stranger = TestPeer::connect(&router);
    stranger.relay(&router, alice_id, json!({ "type": "offer" })).await;

    alice.assert_silent();
    stranger.assert_silent();
}

#[tokio::test]
async fn test_relay_does_not_cross_sessions() {
    init_tracing();

    let router = create_test_router();
    let mut alice = TestPeer::connect(&router);
    let mut carol = TestPeer::connect(&router);

    alice.create(&router).await;
    let (_, carol_id) = carol.create(&router).await;

    alice.relay(&router, carol_id, json!({ "type": "offer" })).await;

    carol.assert_silent();
}
