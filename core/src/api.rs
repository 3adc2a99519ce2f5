//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `planlog_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from_path, ApiConfig, AppConfig, LoggingConfig, StreamConfig,
};
pub use crate::error::{CliError, PlanError};
pub use crate::plan::{
    escape_segment, valid_string_id, Change, CompletionOracle, LogSource, Plan,
    PlanCompletionOracle, PlanResourceChanges, PlanSource, PlanStatus, PlanStatusTimestamps,
    Plans, ResourceChange,
};
pub use crate::stream::{LogStreamReader, PollBackoff, ReaderState};
pub use tokio_util::sync::CancellationToken;
