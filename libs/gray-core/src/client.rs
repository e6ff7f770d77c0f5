//! Contract for querying the control plane for current canary state.

use async_trait::async_trait;

use crate::error::InformationClientError;
use crate::model::{GrayInstance, GrayTrackDefinition};

/// Query interface to the control plane, used by the reconciler when a push
/// notification does not carry the full state it describes.
///
/// Calls are synchronous fetches from the caller's point of view; timeout
/// and retry policy belong to the implementation and its configuration, not
/// to this contract.
#[async_trait]
pub trait GrayInformationClient: Send + Sync {
    /// Fetches the current canary status of one instance. An absent
    /// instance id is forwarded to the control plane, which resolves the
    /// service-wide view.
    async fn fetch_instance(
        &self,
        service_id: &str,
        instance_id: Option<&str>,
    ) -> Result<GrayInstance, InformationClientError>;

    /// Fetches all track definitions applying to (service, instance), in
    /// control-plane order.
    async fn fetch_track_definitions(
        &self,
        service_id: &str,
        instance_id: Option<&str>,
    ) -> Result<Vec<GrayTrackDefinition>, InformationClientError>;
}
