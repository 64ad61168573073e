pub mod in_process_client;

pub use in_process_client::*;
pub use mock_media::*;
