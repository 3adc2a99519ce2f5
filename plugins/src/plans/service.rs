use async_trait::async_trait;
use bytes::Bytes;
use planlog_core::api::{escape_segment, ApiConfig, LogSource, Plan, PlanError, PlanSource};
use url::Url;

use crate::http::jsonapi::{plan_from_document, PlanDocument};
use crate::http::{ApiClient, ApiHttpError};

/// Plan records and log chunks served by a TFE-compatible HTTP API.
#[derive(Clone)]
pub struct PlanServicePlugin {
    client: ApiClient,
}

impl PlanServicePlugin {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(cfg: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(ApiClient::from_config(cfg)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn not_found_or(err: ApiHttpError, plan_id: &str) -> PlanError {
    if err.status() == Some(404) {
        PlanError::NotFound {
            plan_id: plan_id.to_string(),
        }
    } else {
        err.into()
    }
}

#[async_trait]
impl PlanSource for PlanServicePlugin {
    fn name(&self) -> &str {
        "plan_service"
    }

    async fn read_plan(&self, plan_id: &str) -> Result<Plan, PlanError> {
        let url = self
            .client
            .resolve(&format!("plans/{}", escape_segment(plan_id)))?;
        let doc: PlanDocument = self
            .client
            .get_json(&url)
            .await
            .map_err(|err| not_found_or(err, plan_id))?;
        let plan = plan_from_document(doc)?;
        tracing::debug!(
            target: "planlog.plans",
            stage = "plans.read.out",
            plan_id = %plan.id,
            status = %plan.status,
            has_log = !plan.log_read_url.is_empty()
        );
        Ok(plan)
    }

    async fn read_raw(&self, path: &str) -> Result<Bytes, PlanError> {
        let url = self.client.resolve(path)?;
        self.client.get(&url).await.map_err(PlanError::from)
    }
}

#[async_trait]
impl LogSource for PlanServicePlugin {
    async fn fetch_chunk(
        &self,
        log_url: &Url,
        offset: u64,
        limit: usize,
    ) -> Result<Bytes, PlanError> {
        self.client
            .get_log_chunk(log_url, offset, limit)
            .await
            .map_err(PlanError::from)
    }
}
