//! Event-driven reconciliation of local canary state.
//!
//! The control plane pushes notifications about two kinds of canary state:
//! instance status and routing-track definitions. This crate converts those
//! notifications into local state changes, tolerating at-least-once
//! delivery (handlers are idempotent) and arbitrary ordering across
//! distinct (service, instance) pairs.
//!
//! ## Architecture
//!
//! ```text
//! transport ──► GrayEventMsg ──► GrayEventReconciler
//!                                      │
//!                       ┌──────────────┴──────────────┐
//!                INSTANCE events                TRACK events
//!                      │                             │
//!               filter: self-service          filter: local identity
//!                      │                             │
//!               DOWN? deactivate              DOWN+inline? delete
//!               always fetch + upsert         inline? upsert
//!                                             no inline? resync list
//! ```
//!
//! A notification that omits the full state it describes triggers a
//! synchronous resync fetch through [`gray_core::GrayInformationClient`].
//! Fetch and store failures propagate out of [`GrayEventReconciler::on_event`]
//! to whatever delivered the event; retry policy lives there, not here.

mod error;
mod message;
mod pump;
mod reconciler;

pub use error::EventError;
pub use message::{EventType, GrayEventMsg, SourceType};
pub use pump::run_event_loop;
pub use reconciler::GrayEventReconciler;
