pub use switchboard_core::{ParticipantId, SessionId};

pub mod model {
    pub use switchboard_core::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use switchboard_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use switchboard_client::*;
}
