//! Transport-agnostic event loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::message::GrayEventMsg;
use crate::reconciler::GrayEventReconciler;

/// Drains a channel of event messages into the reconciler.
///
/// Per-message failures are logged with the message id and the loop moves
/// on; delivery guarantees, deduplication beyond idempotence, and retries
/// stay with the transport feeding the channel. The loop ends when every
/// sender is dropped.
pub fn run_event_loop(
    mut rx: mpsc::Receiver<GrayEventMsg>,
    reconciler: Arc<GrayEventReconciler>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let message_id = msg.message_id.clone();
            if let Err(err) = reconciler.on_event(msg).await {
                error!(message_id = %message_id, error = %err, "failed to apply gray event");
            }
        }
        info!("gray event loop stopped");
    })
}
