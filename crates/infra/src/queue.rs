use crate::repos::IScheduledTaskRepo;
use docwatch_domain::{ScheduledTask, TaskStatus, ID};
use std::sync::Arc;

/// Cap on the retry backoff so that high attempt counts do not produce
/// excessively long delays.
const MAX_RETRY_BACKOFF_MILLIS: i64 = 5 * 60 * 1000;

/// Backoff in millis before retrying a task that has failed `attempts`
/// times (exponential with cap).
pub(crate) fn retry_backoff_millis(attempts: i64) -> i64 {
    let attempts = attempts.clamp(0, 31) as u32;
    (1000_i64 * 2_i64.pow(attempts)).min(MAX_RETRY_BACKOFF_MILLIS)
}

#[derive(Debug, Clone)]
pub struct TaskQueueConfig {
    /// Seconds between polls of the task store by the dispatch loop
    pub poll_interval_secs: u64,
    /// Millis a leased task stays exclusive before it becomes redeliverable
    pub lease_timeout_millis: i64,
    /// Delivery attempts before a task is marked failed for good
    pub max_attempts: i64,
    /// Maximum tasks leased per poll
    pub batch_size: i64,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            lease_timeout_millis: 60 * 1000,
            max_attempts: 5,
            batch_size: 100,
        }
    }
}

/// Client handle for the delayed dispatch queue.
///
/// Constructed once during context setup and injected into both the
/// scheduling producer (document use cases) and the dispatch loop consumer,
/// so there is no global queue state. Delivery is at-least-once: a task
/// leased by a consumer that never acknowledges it becomes redeliverable
/// once its lease expires.
#[derive(Clone)]
pub struct TaskQueue {
    tasks: Arc<dyn IScheduledTaskRepo>,
    config: TaskQueueConfig,
}

impl TaskQueue {
    pub fn new(tasks: Arc<dyn IScheduledTaskRepo>, config: TaskQueueConfig) -> Self {
        Self { tasks, config }
    }

    pub fn config(&self) -> &TaskQueueConfig {
        &self.config
    }

    /// Persists a pending task to be delivered at or after `task.run_at`.
    /// Callers re-scheduling a binding must `cancel` first; the queue does
    /// not deduplicate.
    pub async fn schedule(&self, task: ScheduledTask) -> anyhow::Result<()> {
        self.tasks.insert(&task).await
    }

    /// Removes any pending task for the binding; no-op when none exists.
    /// A task already leased keeps running, cancellation only prevents
    /// future delivery.
    pub async fn cancel(&self, document_id: &ID, interval_id: i64) -> anyhow::Result<bool> {
        self.tasks.cancel_by_binding(document_id, interval_id).await
    }

    /// Removes every pending task for a document.
    pub async fn cancel_document(&self, document_id: &ID) -> anyhow::Result<i64> {
        self.tasks.cancel_by_document(document_id).await
    }

    /// Leases tasks due at `now`: pending tasks past `run_at` plus in-flight
    /// tasks whose lease expired (crash redelivery), in non-decreasing
    /// `run_at` order. Each leased task is exclusive until
    /// acknowledged, retried, or its lease runs out.
    pub async fn lease_due(&self, now: i64) -> Vec<ScheduledTask> {
        self.tasks
            .lease_due(
                now,
                now + self.config.lease_timeout_millis,
                self.config.batch_size,
            )
            .await
    }

    /// Acknowledges a delivered task.
    pub async fn ack(&self, task_id: &ID) -> anyhow::Result<()> {
        self.tasks.mark_delivered(task_id).await
    }

    /// Returns a task that failed retryably to the pending state with
    /// backoff, or marks it failed for good once attempts are exhausted.
    /// Returns the resulting status.
    pub async fn retry(&self, task: &ScheduledTask, now: i64) -> anyhow::Result<TaskStatus> {
        let attempts = task.attempts + 1;
        if attempts >= self.config.max_attempts {
            self.tasks.mark_failed(&task.id).await?;
            Ok(TaskStatus::Failed)
        } else {
            let run_at = now + retry_backoff_millis(attempts);
            self.tasks.reschedule(&task.id, run_at).await?;
            Ok(TaskStatus::Pending)
        }
    }
}
