//! Future decoration for executors that migrate tasks between workers.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::pin_project;

use crate::context::TaskContext;

/// A future that installs its captured gray context before every poll of
/// the inner future and removes it after the poll returns.
///
/// Bracketing each poll, rather than the task as a whole, is what keeps
/// thread-local storage coherent when a work-stealing scheduler moves the
/// future to another worker between polls, and what keeps the context from
/// leaking into whatever future that worker polls next.
///
/// A future wrapped while no request was in flight polls straight through
/// to the inner future.
#[pin_project]
pub struct GrayFuture<Fut> {
    #[pin]
    inner: Fut,
    context: Option<TaskContext>,
}

impl<Fut> GrayFuture<Fut> {
    pub(crate) fn new(inner: Fut, context: Option<TaskContext>) -> Self {
        Self { inner, context }
    }

    /// Whether a context was captured at wrap time.
    pub fn is_tracked(&self) -> bool {
        self.context.is_some()
    }
}

impl<Fut: Future> Future for GrayFuture<Fut> {
    type Output = Fut::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.context {
            Some(context) => {
                let _guard = context.enter();
                this.inner.poll(cx)
            }
            None => this.inner.poll(cx),
        }
    }
}
