//! Local canary state stores mutated by the event reconciler.
//!
//! The store contracts accept concurrent upserts; the in-memory
//! implementations use `DashMap` so reconciliation and routing reads never
//! need an external lock.

use dashmap::DashMap;
use tracing::debug;

use crate::model::{GrayInstance, GrayStatus, GrayTrackDefinition};

/// Store of canary instance status, keyed by (service id, instance id).
pub trait InstanceStore: Send + Sync {
    fn upsert(&self, instance: GrayInstance);

    /// Marks the named instance closed locally. `None` closes every known
    /// instance of the service.
    fn deactivate(&self, service_id: &str, instance_id: Option<&str>);

    fn get(&self, service_id: &str, instance_id: &str) -> Option<GrayInstance>;

    fn list_by_service(&self, service_id: &str) -> Vec<GrayInstance>;
}

/// Store of routing-track definitions, keyed by name.
pub trait TrackStore: Send + Sync {
    fn upsert(&self, definition: GrayTrackDefinition);

    fn delete_by_name(&self, name: &str);

    fn get(&self, name: &str) -> Option<GrayTrackDefinition>;

    fn names(&self) -> Vec<String>;
}

/// Concurrent in-memory [`InstanceStore`].
#[derive(Debug, Default)]
pub struct MemoryInstanceStore {
    instances: DashMap<(String, String), GrayInstance>,
}

impl MemoryInstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl InstanceStore for MemoryInstanceStore {
    fn upsert(&self, instance: GrayInstance) {
        debug!(
            service_id = %instance.service_id,
            instance_id = %instance.instance_id,
            status = ?instance.status,
            "upserting gray instance"
        );
        let key = (instance.service_id.clone(), instance.instance_id.clone());
        self.instances.insert(key, instance);
    }

    fn deactivate(&self, service_id: &str, instance_id: Option<&str>) {
        match instance_id {
            Some(instance_id) => {
                let key = (service_id.to_string(), instance_id.to_string());
                if let Some(mut entry) = self.instances.get_mut(&key) {
                    debug!(service_id, instance_id, "closing gray instance");
                    entry.status = GrayStatus::Closed;
                }
            }
            None => {
                debug!(service_id, "closing all gray instances of service");
                for mut entry in self.instances.iter_mut() {
                    if entry.key().0 == service_id {
                        entry.status = GrayStatus::Closed;
                    }
                }
            }
        }
    }

    fn get(&self, service_id: &str, instance_id: &str) -> Option<GrayInstance> {
        let key = (service_id.to_string(), instance_id.to_string());
        self.instances.get(&key).map(|entry| entry.clone())
    }

    fn list_by_service(&self, service_id: &str) -> Vec<GrayInstance> {
        self.instances
            .iter()
            .filter(|entry| entry.key().0 == service_id)
            .map(|entry| entry.clone())
            .collect()
    }
}

/// Concurrent in-memory [`TrackStore`].
#[derive(Debug, Default)]
pub struct MemoryTrackStore {
    definitions: DashMap<String, GrayTrackDefinition>,
}

impl MemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl TrackStore for MemoryTrackStore {
    fn upsert(&self, definition: GrayTrackDefinition) {
        debug!(name = %definition.name, "upserting track definition");
        self.definitions.insert(definition.name.clone(), definition);
    }

    fn delete_by_name(&self, name: &str) {
        debug!(name, "deleting track definition");
        self.definitions.remove(name);
    }

    fn get(&self, name: &str) -> Option<GrayTrackDefinition> {
        self.definitions.get(name).map(|entry| entry.clone())
    }

    fn names(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }
}
