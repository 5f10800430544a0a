mod inmemory;
mod postgres;

pub use inmemory::InMemoryScheduledTaskRepo;
pub use postgres::PostgresScheduledTaskRepo;

use docwatch_domain::{ScheduledTask, ID};

/// Durable store behind the delayed dispatch queue.
///
/// `lease_due` is the mutual-exclusion boundary between concurrent
/// consumers: a returned task is exclusively leased until `mark_delivered`,
/// `reschedule`, `mark_failed`, or lease expiry. Failed tasks are kept so
/// an operator can see what was dropped.
#[async_trait::async_trait]
pub trait IScheduledTaskRepo: Send + Sync {
    async fn insert(&self, task: &ScheduledTask) -> anyhow::Result<()>;
    /// Deletes the pending task for the binding, if any. Returns whether
    /// one existed. In-flight tasks are left alone.
    async fn cancel_by_binding(&self, document_id: &ID, interval_id: i64) -> anyhow::Result<bool>;
    /// Deletes every pending task of a document; returns how many.
    async fn cancel_by_document(&self, document_id: &ID) -> anyhow::Result<i64>;
    /// Marks due tasks in-flight with the given lease expiry and returns
    /// them in non-decreasing `run_at` order. Due means pending with
    /// `run_at <= now`, or in-flight with an expired lease.
    async fn lease_due(&self, now: i64, lease_expires_at: i64, limit: i64) -> Vec<ScheduledTask>;
    async fn mark_delivered(&self, task_id: &ID) -> anyhow::Result<()>;
    /// Returns an in-flight task to pending with a new `run_at` and bumps
    /// its attempt count.
    async fn reschedule(&self, task_id: &ID, run_at: i64) -> anyhow::Result<()>;
    async fn mark_failed(&self, task_id: &ID) -> anyhow::Result<()>;
    async fn find(&self, task_id: &ID) -> Option<ScheduledTask>;
    /// The outstanding (pending or in-flight) task for a binding, if any.
    async fn find_by_binding(&self, document_id: &ID, interval_id: i64) -> Option<ScheduledTask>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_context;
    use docwatch_domain::TaskStatus;

    fn task_factory(run_at: i64) -> ScheduledTask {
        ScheduledTask::new(ID::default(), ID::default(), 3, run_at)
    }

    #[tokio::test]
    async fn leases_due_tasks_in_run_at_order() {
        let ctx = setup_test_context();
        let repo = &ctx.repos.scheduled_tasks;

        repo.insert(&task_factory(300)).await.unwrap();
        repo.insert(&task_factory(100)).await.unwrap();
        repo.insert(&task_factory(200)).await.unwrap();
        repo.insert(&task_factory(9000)).await.unwrap();

        let leased = repo.lease_due(500, 500 + 60_000, 100).await;
        assert_eq!(leased.len(), 3);
        assert_eq!(
            leased.iter().map(|t| t.run_at).collect::<Vec<_>>(),
            vec![100, 200, 300]
        );
        assert!(leased.iter().all(|t| t.status == TaskStatus::InFlight));

        // Already leased, nothing is due again before the lease runs out
        assert!(repo.lease_due(501, 501 + 60_000, 100).await.is_empty());
    }

    #[tokio::test]
    async fn expired_leases_are_redelivered() {
        let ctx = setup_test_context();
        let repo = &ctx.repos.scheduled_tasks;

        let task = task_factory(100);
        repo.insert(&task).await.unwrap();

        let leased = repo.lease_due(100, 100 + 1000, 100).await;
        assert_eq!(leased.len(), 1);

        // Lease still held
        assert!(repo.lease_due(1000, 1000 + 1000, 100).await.is_empty());

        // Lease expired without an ack: the task comes back
        let redelivered = repo.lease_due(1200, 1200 + 1000, 100).await;
        assert_eq!(redelivered.len(), 1);
        assert_eq!(redelivered[0].id, task.id);
    }

    #[tokio::test]
    async fn acknowledged_tasks_are_not_redelivered() {
        let ctx = setup_test_context();
        let repo = &ctx.repos.scheduled_tasks;

        let task = task_factory(100);
        repo.insert(&task).await.unwrap();

        let leased = repo.lease_due(100, 1100, 100).await;
        repo.mark_delivered(&leased[0].id).await.unwrap();

        assert!(repo.lease_due(5000, 6000, 100).await.is_empty());
        let found = repo.find(&task.id).await.unwrap();
        assert_eq!(found.status, TaskStatus::Delivered);
    }

    #[tokio::test]
    async fn cancel_removes_only_pending_tasks() {
        let ctx = setup_test_context();
        let repo = &ctx.repos.scheduled_tasks;

        let task = task_factory(100);
        repo.insert(&task).await.unwrap();

        assert!(repo
            .cancel_by_binding(&task.document_id, task.interval_id)
            .await
            .unwrap());
        // No-op when nothing is pending
        assert!(!repo
            .cancel_by_binding(&task.document_id, task.interval_id)
            .await
            .unwrap());

        // An in-flight task is not cancellable, the lease holder finishes
        let task = task_factory(100);
        repo.insert(&task).await.unwrap();
        repo.lease_due(100, 1100, 100).await;
        assert!(!repo
            .cancel_by_binding(&task.document_id, task.interval_id)
            .await
            .unwrap());
        assert!(repo.find(&task.id).await.is_some());
    }

    #[tokio::test]
    async fn reschedule_bumps_attempts_and_returns_to_pending() {
        let ctx = setup_test_context();
        let repo = &ctx.repos.scheduled_tasks;

        let task = task_factory(100);
        repo.insert(&task).await.unwrap();
        repo.lease_due(100, 1100, 100).await;

        repo.reschedule(&task.id, 5000).await.unwrap();
        let found = repo.find(&task.id).await.unwrap();
        assert_eq!(found.status, TaskStatus::Pending);
        assert_eq!(found.attempts, 1);
        assert_eq!(found.run_at, 5000);

        // Not due before the new run_at
        assert!(repo.lease_due(4000, 5000, 100).await.is_empty());
        assert_eq!(repo.lease_due(5000, 6000, 100).await.len(), 1);
    }
}
