//! Core model and contracts for the graymesh client agent.
//!
//! This crate holds everything the other graymesh libraries share:
//!
//! - **Canary state model**: [`GrayInstance`], [`GrayStatus`],
//!   [`GrayTrackDefinition`]: the control plane's view of which instances
//!   take gray traffic and under which named rule sets.
//! - **Request model**: [`GrayRequest`] (the semantic representation of an
//!   intercepted request) and [`GrayTrackInfo`] (the opaque token tying a
//!   request to its canary cohort).
//! - **Request-local storage**: the [`RequestLocalStorage`] /
//!   [`LocalStorageLifeCycle`] contracts and their thread-local
//!   implementation. Storage handles are process-wide; the data they reach
//!   is private to the calling thread.
//! - **Local stores**: [`InstanceStore`] / [`TrackStore`] contracts with
//!   concurrent in-memory implementations the event reconciler mutates.
//! - **Control-plane query contract**: [`GrayInformationClient`], the
//!   synchronous-fetch interface used for resynchronization.
//!
//! The propagation and reconciliation logic live in their own crates
//! (`gray-propagation`, `gray-events`); this crate has no opinion on either.

mod client;
mod error;
mod local;
mod model;
mod request;
mod storage;
mod store;

pub use client::GrayInformationClient;
pub use error::{InformationClientError, StorageError, StorageResult};
pub use local::{InstanceLocalInfo, InstanceLocalInfoHolder};
pub use model::{GrayInstance, GrayStatus, GrayTrackDefinition};
pub use request::{GrayRequest, GrayRequestSettings, GrayTrackInfo};
pub use storage::{
    LocalStorageLifeCycle, RequestLocalStorage, ThreadLocalLifeCycle, ThreadLocalRequestStorage,
};
pub use store::{InstanceStore, MemoryInstanceStore, MemoryTrackStore, TrackStore};
