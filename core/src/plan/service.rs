use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::StreamConfig;
use crate::error::PlanError;
use crate::stream::{LogStreamReader, PollBackoff};

use super::id::{escape_segment, valid_string_id};
use super::model::{Plan, PlanResourceChanges};
use super::oracle::PlanCompletionOracle;
use super::source::{LogSource, PlanSource};

/// Plan operations on top of the injected transport collaborators.
#[derive(Clone)]
pub struct Plans {
    source: Arc<dyn PlanSource>,
    logs: Arc<dyn LogSource>,
    backoff: PollBackoff,
}

impl Plans {
    pub fn new(source: Arc<dyn PlanSource>, logs: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            logs,
            backoff: PollBackoff::default(),
        }
    }

    pub fn with_stream_config(mut self, cfg: &StreamConfig) -> Self {
        self.backoff = PollBackoff::from(cfg);
        self
    }

    pub fn with_backoff(mut self, backoff: PollBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Read a plan by its ID.
    pub async fn read(&self, plan_id: &str) -> Result<Plan, PlanError> {
        if !valid_string_id(plan_id) {
            return Err(PlanError::InvalidPlanId);
        }
        self.source.read_plan(plan_id).await
    }

    /// Open a live log stream for a plan.
    ///
    /// Fails before any log fetch when the ID is malformed, the plan does not
    /// exist, or the plan has no log URL yet. `cancel` aborts the lookup here
    /// and any later blocking read on the returned stream.
    pub async fn logs(
        &self,
        plan_id: &str,
        cancel: CancellationToken,
    ) -> Result<LogStreamReader, PlanError> {
        if !valid_string_id(plan_id) {
            return Err(PlanError::InvalidPlanId);
        }

        let plan = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PlanError::Cancelled),
            res = self.source.read_plan(plan_id) => res?,
        };

        if plan.log_read_url.trim().is_empty() {
            return Err(PlanError::MissingLogUrl {
                plan_id: plan_id.to_string(),
            });
        }

        let log_url = Url::parse(&plan.log_read_url).map_err(|err| PlanError::InvalidLogUrl {
            url: plan.log_read_url.clone(),
            reason: err.to_string(),
        })?;

        // Poll by the canonical ID the service returned.
        let oracle_id = if plan.id.is_empty() {
            plan_id.to_string()
        } else {
            plan.id.clone()
        };

        tracing::debug!(
            target: "planlog.plans",
            stage = "plans.logs.open",
            plan_id = %oracle_id,
            status = %plan.status
        );

        let oracle = PlanCompletionOracle::new(self.source.clone(), oracle_id);
        Ok(
            LogStreamReader::new(log_url, self.logs.clone(), Box::new(oracle), cancel)
                .with_backoff(self.backoff),
        )
    }

    /// Retrieve the JSON execution plan.
    pub async fn read_json_output(&self, plan_id: &str) -> Result<Bytes, PlanError> {
        if !valid_string_id(plan_id) {
            return Err(PlanError::InvalidPlanId);
        }
        let path = format!("plans/{}/json-output", escape_segment(plan_id));
        self.source.read_raw(&path).await
    }

    /// Fetch the resources changed by a plan, from its redacted JSON output.
    pub async fn read_resource_changes(
        &self,
        plan_id: &str,
    ) -> Result<PlanResourceChanges, PlanError> {
        if !valid_string_id(plan_id) {
            return Err(PlanError::InvalidPlanId);
        }
        let path = format!("plans/{}/json-output-redacted", escape_segment(plan_id));
        let body = self.source.read_raw(&path).await?;
        let changes = serde_json::from_slice::<PlanResourceChanges>(&body)?;
        Ok(changes)
    }
}
