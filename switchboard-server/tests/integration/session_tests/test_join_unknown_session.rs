use switchboard_core::{ServerMessage, SessionId};

use crate::integration::{create_test_router, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_join_never_created_session() {
    init_tracing();

    let router = create_test_router();
    let mut peer = TestPeer::connect(&router);

    let reply = peer.try_join(&router, &SessionId::from("no-such-call")).await;

    let ServerMessage::JoinResult {
        success,
        reason,
        session_id,
        participant_id,
    } = reply
    else {
        panic!("Expected JoinResult, got {:?}", reply);
    };
    assert!(!success);
    assert!(reason.expect("Reason should be present").contains("no-such-call"));
    assert!(session_id.is_none());
    assert!(participant_id.is_none());

    assert!(router.registry().resolve_by_address(peer.address.id()).is_err());
}

#[tokio::test]
async fn test_join_vacated_session() {
    init_tracing();

    let router = create_test_router();
    let mut host = TestPeer::connect(&router);
    let (session_id, _) = host.create(&router).await;

    router.handle_disconnect(host.address.id()).await;
    assert!(!router.registry().contains_session(&session_id));

    let mut late = TestPeer::connect(&router);
    let reply = late.try_join(&router, &session_id).await;
    assert!(matches!(
        reply,
        ServerMessage::JoinResult { success: false, reason: Some(_), .. }
    ));
}
