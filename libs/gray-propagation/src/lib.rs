//! Gray-context propagation across asynchronous execution boundaries.
//!
//! When application code hands work to a thread pool, the request that
//! triggered the work is long gone by the time a worker picks it up, and
//! with it the tracking state that gray routing decisions depend on. This
//! crate closes that gap.
//!
//! ## Architecture
//!
//! ```text
//! submitting thread                          worker thread
//!       │                                         │
//!  wrap(task) ── capture snapshot                 │
//!       │        {track info, request}            │
//!       └──────────► decorated task ──────────────┤
//!                                        install snapshot
//!                                        run task
//!                                        remove snapshot   (always)
//! ```
//!
//! Capture runs synchronously on the submitting thread and is a handful of
//! storage reads. Install/cleanup run on the worker: the tracking token is
//! installed unconditionally (a pooled worker must not retain a previous
//! task's state), the request only when the worker has none, and removal
//! runs on every exit path: normal return, panic, or future drop.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use gray_core::{ThreadLocalLifeCycle, ThreadLocalRequestStorage};
//! use gray_propagation::GrayTaskDecorator;
//!
//! let decorator = GrayTaskDecorator::new(
//!     Arc::new(ThreadLocalRequestStorage::new()),
//!     Arc::new(ThreadLocalLifeCycle::new()),
//! );
//!
//! // Fire-and-forget hand-off to a worker thread:
//! let task = decorator.wrap(|| {
//!     // runs with the submitting thread's tracking context installed
//! });
//! std::thread::spawn(task);
//! ```
//!
//! Tasks submitted while no request is in flight are returned undecorated;
//! background work pays nothing beyond a null check.

mod context;
mod decorator;
mod future;

pub use context::TaskContext;
pub use decorator::GrayTaskDecorator;
pub use future::GrayFuture;
