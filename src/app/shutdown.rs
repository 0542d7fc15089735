//! Stopping background tasks at the end of a crawl.

use tokio_util::sync::CancellationToken;

/// Cancels the progress logger and waits for it to finish.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        if let Err(e) = logging_task.await {
            log::warn!("Progress logging task ended abnormally: {e}");
        }
    }
}
