mod media;
mod negotiation;
mod session;
mod transport;

pub use media::*;
pub use negotiation::*;
pub use session::*;
pub use transport::*;
