use async_trait::async_trait;
use std::time::Duration;

use crate::types::NudgeJob;

/// Best-effort delivery of nudges.
///
/// `dispatch` cannot fail: whatever goes wrong is logged and dropped, so a
/// nudge never changes the reply the requester gets. Nothing is retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, job: NudgeJob);

    /// False when dispatched nudges never reach anyone.
    fn delivers(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn dispatch(&self, job: NudgeJob) {
        (**self).dispatch(job).await
    }

    fn delivers(&self) -> bool {
        (**self).delivers()
    }
}

/// Hands nudges to the processor lambda through SQS.
pub struct QueueNotifier {
    client: aws_sdk_sqs::Client,
    queue_url: String,
    timeout: Duration,
}

impl QueueNotifier {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: String, timeout: Duration) -> Self {
        Self {
            client,
            queue_url,
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for QueueNotifier {
    async fn dispatch(&self, job: NudgeJob) {
        let body = match serde_json::to_string(&job) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode nudge");
                return;
            }
        };

        let send = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send();

        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(_)) => {
                tracing::info!(recipient = %job.recipient_id, kind = ?job.kind, "Nudge queued");
            }
            Ok(Err(e)) => {
                tracing::warn!(recipient = %job.recipient_id, error = %e, "Failed to queue nudge");
            }
            Err(_) => {
                tracing::warn!(recipient = %job.recipient_id, "Timed out queueing nudge");
            }
        }
    }
}

/// Dry-run stand-in: logs what would have been sent.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn dispatch(&self, job: NudgeJob) {
        tracing::info!(
            recipient = %job.recipient_id,
            kind = ?job.kind,
            missing = ?job.missing_fields,
            "Dry run: nudge not sent"
        );
    }

    fn delivers(&self) -> bool {
        false
    }
}
