use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a plan as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Canceled,
    Created,
    Errored,
    Finished,
    MfaWaiting,
    Pending,
    Queued,
    Running,
    Unreachable,
    /// A status this client does not know about yet; treated as still in flight.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PlanStatus {
    /// Terminal statuses never transition further.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Errored | Self::Finished | Self::Unreachable
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canceled => "canceled",
            Self::Created => "created",
            Self::Errored => "errored",
            Self::Finished => "finished",
            Self::MfaWaiting => "mfa_waiting",
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Unreachable => "unreachable",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanStatusTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errored_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub has_changes: bool,
    pub generated_configuration: bool,
    /// Empty when the plan has not produced a log yet.
    pub log_read_url: String,
    pub resource_additions: i64,
    pub resource_changes: i64,
    pub resource_destructions: i64,
    pub resource_imports: i64,
    pub status: PlanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_timestamps: Option<PlanStatusTimestamps>,
    /// IDs of related plan exports.
    #[serde(default)]
    pub exports: Vec<String>,
}

/// Changes made to a single resource within a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub change: Change,
    /// String or number depending on how the resource is indexed.
    #[serde(default)]
    pub index: serde_json::Value,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
}

/// Before and after states of a resource, plus the actions taken.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub after: serde_json::Value,
    #[serde(default)]
    pub after_sensitive: serde_json::Value,
    #[serde(default)]
    pub after_unknown: serde_json::Value,
    #[serde(default)]
    pub before: serde_json::Value,
    #[serde(default)]
    pub before_sensitive: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResourceChanges {
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn terminal_statuses() {
        let terminal: Vec<_> = [
            PlanStatus::Canceled,
            PlanStatus::Created,
            PlanStatus::Errored,
            PlanStatus::Finished,
            PlanStatus::MfaWaiting,
            PlanStatus::Pending,
            PlanStatus::Queued,
            PlanStatus::Running,
            PlanStatus::Unreachable,
            PlanStatus::Unknown,
        ]
        .into_iter()
        .filter(|s| s.is_terminal())
        .collect();
        assert_eq!(
            terminal,
            vec![
                PlanStatus::Canceled,
                PlanStatus::Errored,
                PlanStatus::Finished,
                PlanStatus::Unreachable
            ]
        );
    }

    #[test]
    fn status_wire_names() {
        let s: PlanStatus = serde_json::from_str("\"mfa_waiting\"").unwrap();
        assert_eq!(s, PlanStatus::MfaWaiting);
        assert_eq!(serde_json::to_string(&PlanStatus::Errored).unwrap(), "\"errored\"");
    }

    #[test]
    fn unrecognized_status_is_unknown_and_not_terminal() {
        let s: PlanStatus = serde_json::from_str("\"managed_queued\"").unwrap();
        assert_eq!(s, PlanStatus::Unknown);
        assert!(!s.is_terminal());
    }

    #[test]
    fn resource_changes_decode() {
        let body = r#"{
            "resource_changes": [{
                "address": "null_resource.a[0]",
                "index": 0,
                "mode": "managed",
                "name": "a",
                "provider_name": "registry.terraform.io/hashicorp/null",
                "type": "null_resource",
                "change": {"actions": ["create"], "before": null, "after": {"triggers": null}}
            }]
        }"#;
        let parsed: PlanResourceChanges = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.resource_changes.len(), 1);
        let rc = &parsed.resource_changes[0];
        assert_eq!(rc.resource_type, "null_resource");
        assert_eq!(rc.index, serde_json::json!(0));
        assert_eq!(rc.change.actions, vec!["create".to_string()]);
        assert!(rc.change.before.is_null());
    }
}
