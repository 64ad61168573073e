use std::env;
use std::net::{AddrParseError, SocketAddr};
use switchboard_core::IceServerConfig;
use thiserror::Error;

pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Pushed to every client on connect.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3001)),
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_URL)],
        }
    }
}

impl ServerConfig {
    /// Reads `SWITCHBOARD_BIND`, `TURN_URL`, `TURN_USERNAME` and `TURN_CREDENTIAL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SWITCHBOARD_BIND") {
            config.bind_addr = value
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr { value, source })?;
        }

        if let Some(turn_url) = lookup("TURN_URL") {
            config.ice_servers.push(IceServerConfig {
                urls: vec![turn_url],
                username: lookup("TURN_USERNAME"),
                credential: lookup("TURN_CREDENTIAL"),
            });
        }

        Ok(config)
    }

    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }
}
