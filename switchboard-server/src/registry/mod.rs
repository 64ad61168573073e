mod registry_error;
mod session;
mod session_registry;

pub use registry_error::*;
pub use session::*;
pub use session_registry::*;
