//! Captured execution context for a deferred unit of work.

use std::sync::Arc;

use tracing::error;

use gray_core::{GrayRequest, GrayTrackInfo, LocalStorageLifeCycle, RequestLocalStorage};

/// Snapshot of a submitting thread's gray state.
///
/// Holds the process-wide storage and lifecycle handles plus the two
/// captured values. Built at submission time, installed on the executing
/// worker for the duration of one unit of work.
pub struct TaskContext {
    pub(crate) storage: Arc<dyn RequestLocalStorage>,
    pub(crate) lifecycle: Arc<dyn LocalStorageLifeCycle>,
    pub(crate) track_info: GrayTrackInfo,
    pub(crate) request: Option<GrayRequest>,
}

impl TaskContext {
    /// Installs the snapshot into the executing worker's storage and returns
    /// a guard that removes it again when dropped.
    ///
    /// The tracking token overwrites whatever a previous pool task may have
    /// left behind. The request is installed only when the worker has none,
    /// so an existing request scope is never clobbered.
    ///
    /// Install operates on process-local structures and must not fail; a
    /// failure here is a defect in the storage wiring, not a recoverable
    /// condition, so it panics instead of being swallowed.
    pub(crate) fn enter(&self) -> ContextGuard<'_> {
        self.lifecycle.init_context();

        self.storage
            .set_track_info(self.track_info.clone())
            .expect("installing tracking context on a worker must not fail");

        if let Some(request) = &self.request {
            let worker_has_request = self
                .storage
                .get_request()
                .expect("reading worker request slot during install must not fail")
                .is_some();
            if !worker_has_request {
                self.storage
                    .set_request(request.clone())
                    .expect("installing gray request on a worker must not fail");
            }
        }

        ContextGuard {
            storage: &*self.storage,
            lifecycle: &*self.lifecycle,
        }
    }
}

/// Removes the installed context when dropped, so cleanup runs on every exit
/// path including unwind.
pub(crate) struct ContextGuard<'a> {
    storage: &'a dyn RequestLocalStorage,
    lifecycle: &'a dyn LocalStorageLifeCycle,
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        // Cleanup failures cannot propagate out of Drop; log them loudly,
        // since a worker left with stale context is a correctness hazard.
        if let Err(err) = self.storage.remove_track_info() {
            error!(error = %err, "failed to remove tracking context from worker storage");
        }
        if let Err(err) = self.storage.remove_request() {
            error!(error = %err, "failed to remove gray request from worker storage");
        }
        self.lifecycle.close_context();
    }
}
