use super::IDocumentReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use docwatch_domain::{DocumentReminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDocumentReminderRepo {
    pool: PgPool,
}

impl PostgresDocumentReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DocumentReminderRaw {
    reminder_uid: Uuid,
    document_uid: Uuid,
    interval_id: i64,
    enabled: bool,
    sent_at: Option<i64>,
}

impl From<DocumentReminderRaw> for DocumentReminder {
    fn from(raw: DocumentReminderRaw) -> Self {
        Self {
            id: raw.reminder_uid.into(),
            document_id: raw.document_uid.into(),
            interval_id: raw.interval_id,
            enabled: raw.enabled,
            sent_at: raw.sent_at,
        }
    }
}

#[async_trait::async_trait]
impl IDocumentReminderRepo for PostgresDocumentReminderRepo {
    async fn upsert(&self, reminder: &DocumentReminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO document_reminders
            (reminder_uid, document_uid, interval_id, enabled, sent_at)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (document_uid, interval_id)
            DO UPDATE SET enabled = EXCLUDED.enabled, sent_at = EXCLUDED.sent_at
            "#,
        )
        .bind(*reminder.id.inner_ref())
        .bind(*reminder.document_id.inner_ref())
        .bind(reminder.interval_id)
        .bind(reminder.enabled)
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, document_id: &ID, interval_id: i64) -> Option<DocumentReminder> {
        sqlx::query_as::<_, DocumentReminderRaw>(
            r#"
            SELECT * FROM document_reminders
            WHERE document_uid = $1 AND interval_id = $2
            "#,
        )
        .bind(*document_id.inner_ref())
        .bind(interval_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|reminder| reminder.into())
    }

    async fn find_by_document(&self, document_id: &ID) -> Vec<DocumentReminder> {
        sqlx::query_as::<_, DocumentReminderRaw>(
            r#"
            SELECT * FROM document_reminders
            WHERE document_uid = $1
            "#,
        )
        .bind(*document_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }

    async fn set_enabled(
        &self,
        document_id: &ID,
        interval_id: i64,
        enabled: bool,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE document_reminders
            SET enabled = $3, sent_at = NULL
            WHERE document_uid = $1 AND interval_id = $2
            "#,
        )
        .bind(*document_id.inner_ref())
        .bind(interval_id)
        .bind(enabled)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn mark_sent(
        &self,
        document_id: &ID,
        interval_id: i64,
        sent_at: i64,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE document_reminders
            SET sent_at = $3
            WHERE document_uid = $1 AND interval_id = $2
            "#,
        )
        .bind(*document_id.inner_ref())
        .bind(interval_id)
        .bind(sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_sent_by_document(&self, document_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE document_reminders
            SET sent_at = NULL
            WHERE document_uid = $1
            "#,
        )
        .bind(*document_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_by_document(&self, document_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM document_reminders
            WHERE document_uid = $1
            "#,
        )
        .bind(*document_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
