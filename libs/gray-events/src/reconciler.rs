//! Applies control-plane push notifications to local canary state.

use std::sync::Arc;

use tracing::{debug, warn};

use gray_core::{
    GrayInformationClient, InstanceLocalInfo, InstanceLocalInfoHolder, InstanceStore, TrackStore,
};

use crate::error::EventError;
use crate::message::{EventType, GrayEventMsg, SourceType};

/// Converts push notifications into local state changes.
///
/// Handlers are idempotent, so redelivery or reordering of the same message
/// is harmless, and safe to invoke concurrently for distinct (service,
/// instance) pairs; the stores own the concurrency discipline of the
/// mutation itself.
pub struct GrayEventReconciler {
    instance_store: Arc<dyn InstanceStore>,
    track_store: Option<Arc<dyn TrackStore>>,
    information_client: Arc<dyn GrayInformationClient>,
    local_info: Option<InstanceLocalInfo>,
}

impl GrayEventReconciler {
    pub fn new(
        instance_store: Arc<dyn InstanceStore>,
        information_client: Arc<dyn GrayInformationClient>,
    ) -> Self {
        Self {
            instance_store,
            track_store: None,
            information_client,
            local_info: None,
        }
    }

    /// Configures the track-definition store. Without one, TRACK events are
    /// logged and dropped.
    pub fn with_track_store(mut self, track_store: Arc<dyn TrackStore>) -> Self {
        self.track_store = Some(track_store);
        self
    }

    /// Injects the local instance identity explicitly. Without it, identity
    /// is resolved lazily from [`InstanceLocalInfoHolder`].
    pub fn with_local_info(mut self, local_info: InstanceLocalInfo) -> Self {
        self.local_info = Some(local_info);
        self
    }

    /// Single entry point for the transport layer.
    pub async fn on_event(&self, msg: GrayEventMsg) -> Result<(), EventError> {
        debug!(
            message_id = %msg.message_id,
            source_type = ?msg.source_type,
            event_type = ?msg.event_type,
            service_id = %msg.service_id,
            instance_id = ?msg.instance_id,
            "handling gray event"
        );

        match msg.source_type {
            SourceType::Instance => self.handle_instance(&msg).await,
            SourceType::Track => self.handle_track(&msg).await,
            // Unrecognized source types degrade to an instance resync
            // instead of being rejected.
            SourceType::Unknown => {
                self.update_instance(&msg.service_id, msg.instance_id.as_deref())
                    .await
            }
        }
    }

    async fn handle_instance(&self, msg: &GrayEventMsg) -> Result<(), EventError> {
        if let Some(local) = self.local_info() {
            // A service's own gray-status events must not destabilize its
            // local view. Suppression is service-wide on purpose: events
            // about sibling instances of the same service are dropped too.
            if msg.service_id == local.service_id {
                debug!(service_id = %msg.service_id, "suppressing self-referential instance event");
                return Ok(());
            }
        }

        // DOWN deactivates first, then always cascades into the update
        // fetch below.
        if msg.event_type == EventType::Down {
            self.instance_store
                .deactivate(&msg.service_id, msg.instance_id.as_deref());
        }

        self.update_instance(&msg.service_id, msg.instance_id.as_deref())
            .await
    }

    async fn update_instance(
        &self,
        service_id: &str,
        instance_id: Option<&str>,
    ) -> Result<(), EventError> {
        let instance = self
            .information_client
            .fetch_instance(service_id, instance_id)
            .await?;
        self.instance_store.upsert(instance);
        Ok(())
    }

    async fn handle_track(&self, msg: &GrayEventMsg) -> Result<(), EventError> {
        let Some(local) = self.local_info() else {
            // A starting instance may not know its own identity yet;
            // tracking rules are meaningless until it does.
            warn!(message_id = %msg.message_id, "local instance identity unknown; dropping track event");
            return Ok(());
        };

        if msg.service_id != local.service_id {
            return Ok(());
        }
        if let Some(instance_id) = msg.instance_id.as_deref() {
            // Empty instance id means service-wide, which always applies.
            if !instance_id.is_empty() && instance_id != local.instance_id {
                return Ok(());
            }
        }

        let Some(track_store) = &self.track_store else {
            warn!(message_id = %msg.message_id, "no track store configured; dropping track event");
            return Ok(());
        };

        match &msg.source {
            None => {
                // Under-specified notification: never a deletion, always a
                // full resync. Additive and overwriting; definitions the
                // control plane did not return stay untouched.
                let definitions = self
                    .information_client
                    .fetch_track_definitions(&msg.service_id, msg.instance_id.as_deref())
                    .await?;
                debug!(
                    service_id = %msg.service_id,
                    count = definitions.len(),
                    "resynchronized track definitions"
                );
                for definition in definitions {
                    track_store.upsert(definition);
                }
            }
            Some(definition) => {
                // DOWN deletes first, then always cascades into the
                // upsert, so DOWN-with-payload nets out to
                // delete-then-upsert.
                if msg.event_type == EventType::Down {
                    track_store.delete_by_name(&definition.name);
                }
                track_store.upsert(definition.clone());
            }
        }

        Ok(())
    }

    fn local_info(&self) -> Option<InstanceLocalInfo> {
        self.local_info
            .clone()
            .or_else(|| InstanceLocalInfoHolder::get().cloned())
    }
}
