
use std::sync::Arc;
use switchboard_core::IceServerConfig;
use switchboard_server::{SessionRegistry, SignalingRouter};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_router() -> SignalingRouter {
    let registry = Arc::new(SessionRegistry::new());
    SignalingRouter::new(
        registry,
        vec![IceServerConfig::stun("stun:stun.l.google.com:19302")],
    )
}
