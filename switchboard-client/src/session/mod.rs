mod client_command;
mod client_error;
mod client_event;
mod session_client;

pub use client_command::*;
pub use client_error::*;
pub use client_event::*;
pub use session_client::*;
