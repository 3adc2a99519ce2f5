//! Minimal JSON:API document decoding for the resources this crate reads.

use planlog_core::api::{Plan, PlanError, PlanStatus, PlanStatusTimestamps};
use serde::Deserialize;
use std::collections::HashMap;

pub const MEDIA_TYPE: &str = "application/vnd.api+json";

#[derive(Debug, Deserialize)]
pub(crate) struct Document<A> {
    data: Resource<A>,
}

#[derive(Debug, Deserialize)]
struct Resource<A> {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    attributes: A,
    #[serde(default)]
    relationships: HashMap<String, Relationship>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(default)]
    data: Option<Linkage>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Linkage {
    Many(Vec<Identifier>),
    One(Identifier),
}

#[derive(Debug, Deserialize)]
struct Identifier {
    id: String,
}

impl Relationship {
    fn ids(&self) -> Vec<String> {
        match &self.data {
            Some(Linkage::Many(items)) => items.iter().map(|i| i.id.clone()).collect(),
            Some(Linkage::One(item)) => vec![item.id.clone()],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct PlanAttributes {
    has_changes: bool,
    generated_configuration: bool,
    log_read_url: Option<String>,
    resource_additions: i64,
    resource_changes: i64,
    resource_destructions: i64,
    resource_imports: i64,
    status: PlanStatus,
    status_timestamps: Option<PlanStatusTimestamps>,
}

pub(crate) type PlanDocument = Document<PlanAttributes>;

/// Decode a `plans` resource document.
pub fn decode_plan(body: &[u8]) -> Result<Plan, PlanError> {
    plan_from_document(serde_json::from_slice(body)?)
}

pub(crate) fn plan_from_document(doc: PlanDocument) -> Result<Plan, PlanError> {
    let resource = doc.data;
    if resource.kind != "plans" {
        return Err(PlanError::Parse(format!(
            "expected resource type \"plans\", got {:?}",
            resource.kind
        )));
    }

    let exports = resource
        .relationships
        .get("exports")
        .map(Relationship::ids)
        .unwrap_or_default();
    let attrs = resource.attributes;

    Ok(Plan {
        id: resource.id,
        has_changes: attrs.has_changes,
        generated_configuration: attrs.generated_configuration,
        log_read_url: attrs.log_read_url.unwrap_or_default(),
        resource_additions: attrs.resource_additions,
        resource_changes: attrs.resource_changes,
        resource_destructions: attrs.resource_destructions,
        resource_imports: attrs.resource_imports,
        status: attrs.status,
        status_timestamps: attrs.status_timestamps,
        exports,
    })
}
