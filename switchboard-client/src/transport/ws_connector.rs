use crate::media::MediaFactory;
use crate::session::{ClientCommand, ClientError, ClientEvent, SessionClient};
use crate::transport::ClientConfig;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use switchboard_core::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Both directions of an open signaling connection.
pub struct SignalingConnection {
    pub outbound: mpsc::UnboundedSender<ClientMessage>,
    pub inbound: mpsc::UnboundedReceiver<ServerMessage>,
}

pub async fn connect(config: &ClientConfig) -> Result<SignalingConnection, ClientError> {
    let (stream, _) = connect_async(config.url.as_str()).await?;
    info!("Connected to signaling server at {}", config.url);

    let (mut sink, mut source) = stream.split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
    let (inbound_tx, inbound) = mpsc::unbounded_channel::<ServerMessage>();

    tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Failed to encode {:?}: {}", msg, e);
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json.into())).await {
                warn!("Signaling write failed: {}", e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    tokio::spawn(async move {
        while let Some(frame) = source.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(msg) => {
                        if inbound_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid server message: {}", e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Signaling read failed: {}", e);
                    break;
                }
            }
        }
        debug!("Signaling connection closed");
    });

    Ok(SignalingConnection { outbound, inbound })
}

/// A running [`SessionClient`] attached to a live signaling connection.
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<ClientCommand>,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    task: JoinHandle<()>,
}

impl ClientHandle {
    pub async fn connect(
        config: &ClientConfig,
        factory: Arc<dyn MediaFactory>,
    ) -> Result<Self, ClientError> {
        let connection = connect(config).await?;
        let (client, events) = SessionClient::new(factory, connection.outbound);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(client.run(connection.inbound, command_rx));

        Ok(Self {
            commands,
            events,
            task,
        })
    }

    pub fn send(&self, cmd: ClientCommand) -> Result<(), ClientError> {
        self.commands
            .send(cmd)
            .map_err(|_| ClientError::ChannelClosed)
    }

    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        self.events.recv().await
    }

    /// Leaves the session and waits for the client task to wind down.
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            warn!("Session client task failed: {}", e);
        }
    }

    /// Drops the client without leaving, as a crashed tab would.
    pub fn abort(self) {
        self.task.abort();
    }
}
