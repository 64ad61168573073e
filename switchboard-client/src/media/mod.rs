mod media_negotiator;
mod webrtc_media;

pub use media_negotiator::*;
pub use webrtc_media::*;
