mod signaling_router;
mod ws_handler;

pub use signaling_router::*;
pub use ws_handler::*;
