use switchboard_client::{NegotiationState, Role, SdpKind};
use switchboard_core::{NegotiationPayload, ParticipantId};

use crate::integration::{create_test_coordinator, init_tracing, relayed};
use crate::utils::MediaCall;

#[tokio::test]
async fn test_responder_answers_offer() {
    init_tracing();

    let remote = ParticipantId::new();
    let (mut coordinator, mut outbound, log) = create_test_coordinator(remote);

    coordinator
        .handle_payload(NegotiationPayload::Offer {
            sdp: "remote-offer".into(),
        })
        .await;

    assert_eq!(coordinator.role(), Some(Role::Responder));
    assert_eq!(coordinator.state(), NegotiationState::Connected);

    let sent = relayed(&mut outbound);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, remote);
    assert_eq!(
        sent[0].1,
        NegotiationPayload::Answer {
            sdp: format!("answer-for-{}", remote)
        }
    );

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            MediaCall::SetRemote(SdpKind::Offer, "remote-offer".into()),
            MediaCall::CreateAnswer,
            MediaCall::SetLocal(SdpKind::Answer),
        ]
    );
}

#[tokio::test]
async fn test_responder_accepts_renegotiation_offer() {
    init_tracing();

    let (mut coordinator, mut outbound, _log) = create_test_coordinator(ParticipantId::new());
    coordinator
        .handle_payload(NegotiationPayload::Offer { sdp: "o1".into() })
        .await;
    coordinator
        .handle_payload(NegotiationPayload::Offer { sdp: "o2".into() })
        .await;

    assert_eq!(relayed(&mut outbound).len(), 2);
    assert_eq!(coordinator.state(), NegotiationState::Connected);
}

#[tokio::test]
async fn test_responder_cannot_renegotiate() {
    init_tracing();

    let (mut coordinator, mut outbound, _log) = create_test_coordinator(ParticipantId::new());
    coordinator
        .handle_payload(NegotiationPayload::Offer { sdp: "o1".into() })
        .await;
    relayed(&mut outbound);

    coordinator.renegotiate().await;

    assert!(relayed(&mut outbound).is_empty());
    assert_eq!(coordinator.state(), NegotiationState::Connected);
}
