use super::IScheduledTaskRepo;
use crate::repos::shared::inmemory_repo::*;
use docwatch_domain::{ScheduledTask, TaskStatus, ID};
use std::sync::Mutex;

pub struct InMemoryScheduledTaskRepo {
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl InMemoryScheduledTaskRepo {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(vec![]),
        }
    }
}

fn is_due(task: &ScheduledTask, now: i64) -> bool {
    if task.run_at > now {
        return false;
    }
    match task.status {
        TaskStatus::Pending => true,
        TaskStatus::InFlight => task.lease_expires_at.map_or(true, |lease| lease <= now),
        _ => false,
    }
}

#[async_trait::async_trait]
impl IScheduledTaskRepo for InMemoryScheduledTaskRepo {
    async fn insert(&self, task: &ScheduledTask) -> anyhow::Result<()> {
        insert(task, &self.tasks);
        Ok(())
    }

    async fn cancel_by_binding(&self, document_id: &ID, interval_id: i64) -> anyhow::Result<bool> {
        let deleted = find_and_delete_by(&self.tasks, |t| {
            t.document_id == *document_id
                && t.interval_id == interval_id
                && t.status == TaskStatus::Pending
        });
        Ok(!deleted.is_empty())
    }

    async fn cancel_by_document(&self, document_id: &ID) -> anyhow::Result<i64> {
        let deleted = find_and_delete_by(&self.tasks, |t| {
            t.document_id == *document_id && t.status == TaskStatus::Pending
        });
        Ok(deleted.len() as i64)
    }

    async fn lease_due(&self, now: i64, lease_expires_at: i64, limit: i64) -> Vec<ScheduledTask> {
        let mut tasks = self.tasks.lock().unwrap();
        let mut due: Vec<&mut ScheduledTask> =
            tasks.iter_mut().filter(|t| is_due(t, now)).collect();
        due.sort_by_key(|t| t.run_at);
        due.into_iter()
            .take(limit as usize)
            .map(|t| {
                t.status = TaskStatus::InFlight;
                t.lease_expires_at = Some(lease_expires_at);
                t.clone()
            })
            .collect()
    }

    async fn mark_delivered(&self, task_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.tasks,
            |t| t.id == *task_id,
            |t| {
                t.status = TaskStatus::Delivered;
                t.lease_expires_at = None;
            },
        );
        Ok(())
    }

    async fn reschedule(&self, task_id: &ID, run_at: i64) -> anyhow::Result<()> {
        update_many(
            &self.tasks,
            |t| t.id == *task_id,
            |t| {
                t.status = TaskStatus::Pending;
                t.run_at = run_at;
                t.attempts += 1;
                t.lease_expires_at = None;
            },
        );
        Ok(())
    }

    async fn mark_failed(&self, task_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.tasks,
            |t| t.id == *task_id,
            |t| {
                t.status = TaskStatus::Failed;
                t.lease_expires_at = None;
            },
        );
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> Option<ScheduledTask> {
        find(task_id, &self.tasks)
    }

    async fn find_by_binding(&self, document_id: &ID, interval_id: i64) -> Option<ScheduledTask> {
        let mut found = find_by(&self.tasks, |t| {
            t.document_id == *document_id
                && t.interval_id == interval_id
                && matches!(t.status, TaskStatus::Pending | TaskStatus::InFlight)
        });
        if found.is_empty() {
            return None;
        }
        Some(found.remove(0))
    }
}
