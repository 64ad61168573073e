mod client_config;
mod ws_connector;

pub use client_config::*;
pub use ws_connector::*;
