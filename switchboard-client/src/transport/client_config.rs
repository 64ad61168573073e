use std::env;

pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:3001/ws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the signaling server.
    pub url: String,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Reads `SWITCHBOARD_URL`.
    pub fn from_env() -> Self {
        env::var("SWITCHBOARD_URL")
            .map(Self::new)
            .unwrap_or_default()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNALING_URL)
    }
}
