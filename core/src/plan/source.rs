use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::PlanError;

use super::model::Plan;

/// Fetches plan records and raw plan documents.
#[async_trait]
pub trait PlanSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the current record for `plan_id`. A missing plan is `PlanError::NotFound`.
    async fn read_plan(&self, plan_id: &str) -> Result<Plan, PlanError>;

    /// GET a path relative to the API base and return the body untouched.
    async fn read_raw(&self, path: &str) -> Result<Bytes, PlanError>;
}

/// Pulls chunks of an append-only remote log.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Return at most `limit` bytes of the log starting at `offset`.
    /// An empty result means nothing past `offset` has been written yet.
    async fn fetch_chunk(&self, log_url: &Url, offset: u64, limit: usize)
        -> Result<Bytes, PlanError>;
}
