use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("a session is already requested or active")]
    Busy,

    #[error("signaling channel is closed")]
    ChannelClosed,

    #[error("signaling transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}
