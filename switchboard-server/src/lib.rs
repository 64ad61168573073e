mod app;
mod config;
mod registry;
mod signaling;
mod transport;

pub use app::*;
pub use config::*;
pub use registry::*;
pub use signaling::*;
pub use transport::*;
