//! Error types for the core contracts.

use thiserror::Error;

/// Result type for request-local storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by request-local storage implementations.
///
/// Normal absence of a value is `Ok(None)`, never an error. These variants
/// cover genuine internal failures only, such as a re-entrant borrow of a
/// thread slot.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The thread slot is already borrowed by the current call stack
    #[error("request-local slot busy: {0}")]
    SlotBusy(&'static str),
}

/// Errors returned by the control-plane query client.
///
/// The reconciler does not catch these; they propagate to whatever delivered
/// the event, which owns retry policy.
#[derive(Error, Debug)]
pub enum InformationClientError {
    /// Transport-level failure (connect, send, read)
    #[error("control plane transport error: {0}")]
    Transport(String),

    /// Control plane answered with a non-success status
    #[error("control plane returned status {0}")]
    UnexpectedStatus(u16),

    /// Response body could not be decoded into the expected model
    #[error("failed to decode control plane response: {0}")]
    Decode(String),
}
