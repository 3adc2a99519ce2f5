pub mod reader;
pub mod types;

pub use reader::LogStreamReader;
pub use types::{PollBackoff, ReaderState, MIN_POLL_DELAY};
