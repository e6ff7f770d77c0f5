//! Error types for event reconciliation.

use thiserror::Error;

use gray_core::InformationClientError;

/// Errors surfaced by [`crate::GrayEventReconciler::on_event`].
///
/// Unrecognized source types are not an error (they fall back to an
/// instance update), so the only failure mode is a downstream collaborator
/// call. The transport layer that delivered the event decides whether to
/// redeliver.
#[derive(Error, Debug)]
pub enum EventError {
    /// A resync fetch against the control plane failed
    #[error("control plane query failed: {0}")]
    Query(#[from] InformationClientError),

    /// Generic error with context, for store implementations that can fail
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
