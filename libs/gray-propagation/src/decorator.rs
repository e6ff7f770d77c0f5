//! Task decoration: capture on the submitting thread, install/cleanup on
//! the executing worker.

use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use gray_core::{GrayRequest, GrayTrackInfo, LocalStorageLifeCycle, RequestLocalStorage};

use crate::context::TaskContext;
use crate::future::GrayFuture;

/// Decorates deferred units of work so gray-tracking state survives the
/// hand-off from a submitting thread to an executing worker.
///
/// The decorator owns no threads and no scheduler; it only brackets work
/// that some pool it does not own will execute. Cloning is cheap, both
/// handles are shared.
#[derive(Clone)]
pub struct GrayTaskDecorator {
    storage: Arc<dyn RequestLocalStorage>,
    lifecycle: Arc<dyn LocalStorageLifeCycle>,
}

impl GrayTaskDecorator {
    pub fn new(
        storage: Arc<dyn RequestLocalStorage>,
        lifecycle: Arc<dyn LocalStorageLifeCycle>,
    ) -> Self {
        Self { storage, lifecycle }
    }

    /// Snapshots the submitting thread's gray state, or `None` when no
    /// request is in flight on this thread.
    pub fn capture(&self) -> Option<TaskContext> {
        let track_info = self.current_track_info()?;
        Some(TaskContext {
            storage: Arc::clone(&self.storage),
            lifecycle: Arc::clone(&self.lifecycle),
            track_info,
            request: self.current_request(),
        })
    }

    /// Decorates a fire-and-forget task. Without active tracking info the
    /// original task is returned undecorated.
    pub fn wrap<F>(&self, task: F) -> Box<dyn FnOnce() + Send>
    where
        F: FnOnce() + Send + 'static,
    {
        match self.capture() {
            Some(context) => Box::new(move || {
                let _guard = context.enter();
                task();
            }),
            None => Box::new(task),
        }
    }

    /// Decorates a value-returning task. The task's result and panic
    /// semantics pass through unchanged; cleanup runs before either reaches
    /// the caller.
    pub fn wrap_call<F, R>(&self, task: F) -> Box<dyn FnOnce() -> R + Send>
    where
        F: FnOnce() -> R + Send + 'static,
        R: 'static,
    {
        match self.capture() {
            Some(context) => Box::new(move || {
                let _guard = context.enter();
                task()
            }),
            None => Box::new(task),
        }
    }

    /// Decorates a batch element-wise, preserving order. Each element gets
    /// its own snapshot, taken at this call.
    pub fn wrap_all<I, F>(&self, tasks: I) -> Vec<Box<dyn FnOnce() + Send>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() + Send + 'static,
    {
        tasks.into_iter().map(|task| self.wrap(task)).collect()
    }

    /// Decorates a future for executors that may migrate it between worker
    /// threads. See [`GrayFuture`] for the poll-bracketing discipline.
    pub fn wrap_future<Fut>(&self, future: Fut) -> GrayFuture<Fut>
    where
        Fut: Future,
    {
        GrayFuture::new(future, self.capture())
    }

    // Capture-time reads fail soft: tracking is best-effort and must never
    // fail the task it decorates. The error is discarded here, once, with a
    // logged trace of what happened.
    fn current_track_info(&self) -> Option<GrayTrackInfo> {
        match self.storage.get_track_info() {
            Ok(info) => info,
            Err(err) => {
                warn!(error = %err, "failed to read tracking info during capture; proceeding without context");
                None
            }
        }
    }

    fn current_request(&self) -> Option<GrayRequest> {
        match self.storage.get_request() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "failed to read gray request during capture; proceeding without it");
                None
            }
        }
    }
}
