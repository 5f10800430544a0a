use super::INotificationLogRepo;
use docwatch_domain::{NotificationChannel, NotificationLog, NotificationStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    entry_uid: Uuid,
    user_uid: Uuid,
    document_uid: Uuid,
    interval_id: i64,
    channel: String,
    status: String,
    response: String,
    created: i64,
}

impl From<NotificationLogRaw> for NotificationLog {
    fn from(raw: NotificationLogRaw) -> Self {
        Self {
            id: raw.entry_uid.into(),
            user_id: raw.user_uid.into(),
            document_id: raw.document_uid.into(),
            interval_id: raw.interval_id,
            channel: raw.channel.parse().unwrap_or(NotificationChannel::Email),
            status: raw.status.parse().unwrap_or(NotificationStatus::Failed),
            response: raw.response,
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn insert(&self, entry: &NotificationLog) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_log
            (entry_uid, user_uid, document_uid, interval_id, channel, status, response, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(*entry.id.inner_ref())
        .bind(*entry.user_id.inner_ref())
        .bind(*entry.document_id.inner_ref())
        .bind(entry.interval_id)
        .bind(entry.channel.to_string())
        .bind(entry.status.to_string())
        .bind(&entry.response)
        .bind(entry.created)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_document(&self, document_id: &ID) -> Vec<NotificationLog> {
        sqlx::query_as::<_, NotificationLogRaw>(
            r#"
            SELECT * FROM notification_log
            WHERE document_uid = $1
            ORDER BY created ASC
            "#,
        )
        .bind(*document_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.into())
        .collect()
    }
}
