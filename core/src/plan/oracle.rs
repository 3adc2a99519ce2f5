use async_trait::async_trait;
use std::sync::Arc;

use crate::error::PlanError;

use super::source::PlanSource;

/// Answers whether the job behind a log stream will ever write again.
#[async_trait]
pub trait CompletionOracle: Send + Sync {
    async fn is_done(&self) -> Result<bool, PlanError>;
}

/// Re-reads one plan on every call and checks its status for a terminal value.
pub struct PlanCompletionOracle {
    source: Arc<dyn PlanSource>,
    plan_id: String,
}

impl PlanCompletionOracle {
    pub fn new(source: Arc<dyn PlanSource>, plan_id: impl Into<String>) -> Self {
        Self {
            source,
            plan_id: plan_id.into(),
        }
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }
}

#[async_trait]
impl CompletionOracle for PlanCompletionOracle {
    async fn is_done(&self) -> Result<bool, PlanError> {
        let plan = self.source.read_plan(&self.plan_id).await?;
        let done = plan.status.is_terminal();
        tracing::debug!(
            target: "planlog.oracle",
            stage = "oracle.status",
            plan_id = %self.plan_id,
            status = %plan.status,
            done
        );
        Ok(done)
    }
}
