//! Control-plane notification messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gray_core::GrayTrackDefinition;

/// Which kind of canary state a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Instance,
    Track,
    /// Wire values this build does not know. Routed to the default
    /// instance-update handling rather than rejected.
    #[serde(other)]
    Unknown,
}

/// What happened to the state the notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Update,
    Down,
}

/// A control-plane push notification.
///
/// `instance_id` absent or empty means the event applies service-wide.
/// `source` carries an inline track definition when the notification holds
/// full state; without it, TRACK events are a signal to resync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayEventMsg {
    pub message_id: String,
    pub source_type: SourceType,
    pub event_type: EventType,
    pub service_id: String,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub source: Option<GrayTrackDefinition>,
    pub timestamp: DateTime<Utc>,
}

impl GrayEventMsg {
    pub fn new(
        source_type: SourceType,
        event_type: EventType,
        service_id: impl Into<String>,
        instance_id: Option<String>,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            source_type,
            event_type,
            service_id: service_id.into(),
            instance_id,
            source: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches an inline track definition payload.
    pub fn with_source(mut self, definition: GrayTrackDefinition) -> Self {
        self.source = Some(definition);
        self
    }
}
