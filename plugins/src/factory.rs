use std::sync::Arc;

use anyhow::Result;
use planlog_core::api::{AppConfig, Plans};

use crate::plans::PlanServicePlugin;

/// Build the `Plans` facade backed by the HTTP plan service from config.
pub fn build_plans(cfg: &AppConfig) -> Result<Plans> {
    let service = Arc::new(PlanServicePlugin::from_config(&cfg.api)?);
    tracing::debug!(
        target: "planlog.factory",
        stage = "factory.plans",
        base_url = %service.client().base_url()
    );
    Ok(Plans::new(service.clone(), service).with_stream_config(&cfg.stream))
}
