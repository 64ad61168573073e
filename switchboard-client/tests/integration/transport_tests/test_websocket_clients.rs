use anyhow::Result;
use switchboard_client::{ClientCommand, ClientConfig, ClientEvent, ClientHandle, NegotiationState};
use switchboard_server::{AppState, ServerConfig, serve_on};
use tokio::net::TcpListener;

use crate::integration::init_tracing;
use crate::utils::MockMediaFactory;

async fn spawn_server() -> Result<ClientConfig> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(&ServerConfig::default());

    tokio::spawn(async move {
        if let Err(e) = serve_on(listener, state).await {
            tracing::error!("Test server stopped: {:?}", e);
        }
    });

    Ok(ClientConfig::new(format!("ws://{}/ws", addr)))
}

async fn wait_for<F>(handle: &mut ClientHandle, pred: F) -> ClientEvent
where
    F: Fn(&ClientEvent) -> bool,
{
    loop {
        let event = tokio::time::timeout(
            std::time::Duration::from_millis(crate::utils::EVENT_TIMEOUT_MS),
            handle.next_event(),
        )
        .await
        .expect("Timed out waiting for a client event")
        .expect("Client stopped");
        if pred(&event) {
            return event;
        }
    }
}

#[tokio::test]
async fn test_clients_negotiate_over_websocket() -> Result<()> {
    init_tracing();

    let config = spawn_server().await?;
    let mut alice = ClientHandle::connect(&config, MockMediaFactory::new()).await?;
    let mut bob = ClientHandle::connect(&config, MockMediaFactory::new()).await?;

    alice.send(ClientCommand::CreateSession)?;
    let ClientEvent::Ready { session_id, .. } =
        wait_for(&mut alice, |e| matches!(e, ClientEvent::Ready { .. })).await
    else {
        unreachable!();
    };

    bob.send(ClientCommand::JoinSession { session_id })?;
    let ClientEvent::Ready {
        participant_id: bob_id,
        ..
    } = wait_for(&mut bob, |e| matches!(e, ClientEvent::Ready { .. })).await
    else {
        unreachable!();
    };

    wait_for(&mut alice, |e| {
        *e == ClientEvent::NegotiationStateChanged {
            participant_id: bob_id,
            state: NegotiationState::Connected,
        }
    })
    .await;
    wait_for(&mut bob, |e| {
        matches!(
            e,
            ClientEvent::NegotiationStateChanged {
                state: NegotiationState::Connected,
                ..
            }
        )
    })
    .await;

    bob.shutdown().await;
    wait_for(&mut alice, |e| {
        *e == ClientEvent::ParticipantLeft {
            participant_id: bob_id,
        }
    })
    .await;

    alice.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_connect_to_missing_server_fails() {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new(format!("ws://{}/ws", addr));
    let result = ClientHandle::connect(&config, MockMediaFactory::new()).await;
    assert!(result.is_err());
}
