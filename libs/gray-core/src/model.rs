//! Canary state model shared between the reconciler and the local stores.

use serde::{Deserialize, Serialize};

/// Whether an instance currently takes gray traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrayStatus {
    Open,
    Closed,
}

/// Control-plane-resolved canary status for one (service, instance) pair.
///
/// Fetched on demand during reconciliation; the agent does not cache these
/// beyond the local instance store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayInstance {
    pub service_id: String,
    pub instance_id: String,
    pub status: GrayStatus,
    /// Names of routing policies the control plane attached to this
    /// instance. Opaque to the agent.
    #[serde(default)]
    pub policies: Vec<String>,
}

impl GrayInstance {
    pub fn new(
        service_id: impl Into<String>,
        instance_id: impl Into<String>,
        status: GrayStatus,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            instance_id: instance_id.into(),
            status,
            policies: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == GrayStatus::Open
    }
}

/// A named routing rule set. Identified by name; upserted or removed by name.
///
/// The rule payload is opaque here; evaluating it belongs to the routing
/// component, not the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayTrackDefinition {
    pub name: String,
    pub value: String,
}

impl GrayTrackDefinition {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_open_closed() {
        let instance = GrayInstance::new("orders", "i1", GrayStatus::Open);
        assert!(instance.is_open());

        let instance = GrayInstance::new("orders", "i1", GrayStatus::Closed);
        assert!(!instance.is_open());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&GrayStatus::Open).unwrap();
        assert_eq!(json, "\"OPEN\"");

        let status: GrayStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, GrayStatus::Closed);
    }

    #[test]
    fn test_instance_policies_default_on_deserialize() {
        let json = r#"{"service_id":"orders","instance_id":"i1","status":"OPEN"}"#;
        let instance: GrayInstance = serde_json::from_str(json).unwrap();
        assert!(instance.policies.is_empty());
    }
}
