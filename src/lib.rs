//! Graymesh: client-side agent of a canary/gray-release traffic-control
//! plane for microservice meshes.
//!
//! The agent does three jobs:
//!
//! 1. Holds the in-flight request's gray-tracking state in request-local
//!    storage so the routing layer can read it (`gray-core`).
//! 2. Carries that state across thread-pool and future hand-offs with no
//!    leakage between unrelated tasks (`gray-propagation`).
//! 3. Keeps local canary state reconciled with control-plane push
//!    notifications, resyncing over HTTP when a notification is
//!    under-specified (`gray-events`, `gray-control`).
//!
//! [`GrayAgent`] wires the pieces together from configuration; the
//! individual crates remain usable on their own.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use gray_control::{ConfigError, GrayClientConfig, HttpGrayInformationClient};
pub use gray_core::{
    GrayInformationClient, GrayInstance, GrayRequest, GrayRequestSettings, GrayStatus,
    GrayTrackDefinition, GrayTrackInfo, InformationClientError, InstanceLocalInfo,
    InstanceLocalInfoHolder, InstanceStore, LocalStorageLifeCycle, MemoryInstanceStore,
    MemoryTrackStore, RequestLocalStorage, StorageError, StorageResult, ThreadLocalLifeCycle,
    ThreadLocalRequestStorage, TrackStore,
};
pub use gray_events::{
    run_event_loop, EventError, EventType, GrayEventMsg, GrayEventReconciler, SourceType,
};
pub use gray_propagation::{GrayFuture, GrayTaskDecorator, TaskContext};

/// Initialize tracing for host processes that have no subscriber of their
/// own. Honors `RUST_LOG`; embedded deployments with an existing subscriber
/// should skip this.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,graymesh=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One-stop wiring of request-local storage, task decoration, local canary
/// stores, event reconciliation and control-plane connectivity.
pub struct GrayAgent {
    config: GrayClientConfig,
    storage: Arc<ThreadLocalRequestStorage>,
    lifecycle: Arc<ThreadLocalLifeCycle>,
    decorator: GrayTaskDecorator,
    instance_store: Arc<MemoryInstanceStore>,
    track_store: Arc<MemoryTrackStore>,
    reconciler: Arc<GrayEventReconciler>,
}

impl GrayAgent {
    /// Builds an agent talking to the control plane over HTTP.
    pub fn new(config: GrayClientConfig) -> Result<Self, ConfigError> {
        let client = Arc::new(HttpGrayInformationClient::new(&config)?);
        Ok(Self::with_information_client(config, client))
    }

    /// Builds an agent from environment configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(GrayClientConfig::from_env())
    }

    /// Same wiring with a caller-supplied query client, for tests and
    /// alternative transports.
    pub fn with_information_client(
        config: GrayClientConfig,
        client: Arc<dyn GrayInformationClient>,
    ) -> Self {
        let storage = Arc::new(ThreadLocalRequestStorage::new());
        let lifecycle = Arc::new(ThreadLocalLifeCycle::new());
        let decorator = GrayTaskDecorator::new(storage.clone(), lifecycle.clone());

        let instance_store = Arc::new(MemoryInstanceStore::new());
        let track_store = Arc::new(MemoryTrackStore::new());

        let mut reconciler = GrayEventReconciler::new(instance_store.clone(), client)
            .with_track_store(track_store.clone());
        if let Some(local_info) = config.instance_local_info() {
            info!(
                service_id = %local_info.service_id,
                instance_id = %local_info.instance_id,
                "gray agent starting with configured identity"
            );
            reconciler = reconciler.with_local_info(local_info);
        }

        Self {
            config,
            storage,
            lifecycle,
            decorator,
            instance_store,
            track_store,
            reconciler: Arc::new(reconciler),
        }
    }

    /// Opens a request scope on the current thread and installs the
    /// request's tracking state. Called by the interception layer when a
    /// request arrives.
    pub fn begin_request(
        &self,
        track_info: GrayTrackInfo,
        request: Option<GrayRequest>,
    ) -> StorageResult<()> {
        self.lifecycle.init_context();
        self.storage.set_track_info(track_info)?;
        if let Some(request) = request {
            self.storage.set_request(request)?;
        }
        Ok(())
    }

    /// Closes the current thread's request scope.
    pub fn end_request(&self) -> StorageResult<()> {
        self.storage.remove_track_info()?;
        self.storage.remove_request()?;
        self.lifecycle.close_context();
        Ok(())
    }

    /// Spawns the reconciliation loop; the returned sender is the
    /// transport's hand-off point.
    pub fn start_event_loop(
        &self,
        buffer: usize,
    ) -> (mpsc::Sender<GrayEventMsg>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(buffer);
        let handle = run_event_loop(rx, self.reconciler.clone());
        (tx, handle)
    }

    pub fn config(&self) -> &GrayClientConfig {
        &self.config
    }

    pub fn decorator(&self) -> &GrayTaskDecorator {
        &self.decorator
    }

    pub fn storage(&self) -> Arc<ThreadLocalRequestStorage> {
        self.storage.clone()
    }

    pub fn instance_store(&self) -> Arc<MemoryInstanceStore> {
        self.instance_store.clone()
    }

    pub fn track_store(&self) -> Arc<MemoryTrackStore> {
        self.track_store.clone()
    }

    pub fn reconciler(&self) -> Arc<GrayEventReconciler> {
        self.reconciler.clone()
    }
}
