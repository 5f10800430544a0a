use super::IScheduledTaskRepo;
use docwatch_domain::{ScheduledTask, TaskStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresScheduledTaskRepo {
    pool: PgPool,
}

impl PostgresScheduledTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledTaskRaw {
    task_uid: Uuid,
    document_uid: Uuid,
    user_uid: Uuid,
    interval_id: i64,
    run_at: i64,
    status: String,
    attempts: i64,
    lease_expires_at: Option<i64>,
}

impl From<ScheduledTaskRaw> for ScheduledTask {
    fn from(raw: ScheduledTaskRaw) -> Self {
        Self {
            id: raw.task_uid.into(),
            document_id: raw.document_uid.into(),
            user_id: raw.user_uid.into(),
            interval_id: raw.interval_id,
            run_at: raw.run_at,
            status: raw.status.parse().unwrap_or(TaskStatus::Pending),
            attempts: raw.attempts,
            lease_expires_at: raw.lease_expires_at,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledTaskRepo for PostgresScheduledTaskRepo {
    async fn insert(&self, task: &ScheduledTask) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduled_tasks
            (task_uid, document_uid, user_uid, interval_id, run_at, status, attempts, lease_expires_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(*task.id.inner_ref())
        .bind(*task.document_id.inner_ref())
        .bind(*task.user_id.inner_ref())
        .bind(task.interval_id)
        .bind(task.run_at)
        .bind(task.status.to_string())
        .bind(task.attempts)
        .bind(task.lease_expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn cancel_by_binding(&self, document_id: &ID, interval_id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_tasks
            WHERE document_uid = $1 AND interval_id = $2 AND status = 'pending'
            "#,
        )
        .bind(*document_id.inner_ref())
        .bind(interval_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn cancel_by_document(&self, document_id: &ID) -> anyhow::Result<i64> {
        let res = sqlx::query(
            r#"
            DELETE FROM scheduled_tasks
            WHERE document_uid = $1 AND status = 'pending'
            "#,
        )
        .bind(*document_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() as i64)
    }

    async fn lease_due(&self, now: i64, lease_expires_at: i64, limit: i64) -> Vec<ScheduledTask> {
        // SKIP LOCKED keeps concurrent pollers from leasing the same rows
        sqlx::query_as::<_, ScheduledTaskRaw>(
            r#"
            UPDATE scheduled_tasks
            SET status = 'in_flight', lease_expires_at = $2
            WHERE task_uid IN (
                SELECT task_uid FROM scheduled_tasks
                WHERE run_at <= $1
                  AND (status = 'pending'
                       OR (status = 'in_flight' AND lease_expires_at <= $1))
                ORDER BY run_at ASC
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(lease_expires_at)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|task| task.into())
        .collect()
    }

    async fn mark_delivered(&self, task_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_tasks
            SET status = 'delivered', lease_expires_at = NULL
            WHERE task_uid = $1
            "#,
        )
        .bind(*task_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn reschedule(&self, task_id: &ID, run_at: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_tasks
            SET status = 'pending', run_at = $2, attempts = attempts + 1, lease_expires_at = NULL
            WHERE task_uid = $1
            "#,
        )
        .bind(*task_id.inner_ref())
        .bind(run_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(&self, task_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_tasks
            SET status = 'failed', lease_expires_at = NULL
            WHERE task_uid = $1
            "#,
        )
        .bind(*task_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, task_id: &ID) -> Option<ScheduledTask> {
        sqlx::query_as::<_, ScheduledTaskRaw>(
            r#"
            SELECT * FROM scheduled_tasks
            WHERE task_uid = $1
            "#,
        )
        .bind(*task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|task| task.into())
    }

    async fn find_by_binding(&self, document_id: &ID, interval_id: i64) -> Option<ScheduledTask> {
        sqlx::query_as::<_, ScheduledTaskRaw>(
            r#"
            SELECT * FROM scheduled_tasks
            WHERE document_uid = $1 AND interval_id = $2
              AND status IN ('pending', 'in_flight')
            "#,
        )
        .bind(*document_id.inner_ref())
        .bind(interval_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|task| task.into())
    }
}
