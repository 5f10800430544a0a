use super::IReminderIntervalRepo;
use docwatch_domain::ReminderInterval;
use sqlx::{FromRow, PgPool};

pub struct PostgresReminderIntervalRepo {
    pool: PgPool,
}

impl PostgresReminderIntervalRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderIntervalRaw {
    id: i64,
    label: String,
    days_before: i32,
    code: String,
}

impl From<ReminderIntervalRaw> for ReminderInterval {
    fn from(raw: ReminderIntervalRaw) -> Self {
        Self {
            id: raw.id,
            label: raw.label,
            days_before: raw.days_before as u32,
            code: raw.code,
        }
    }
}

#[async_trait::async_trait]
impl IReminderIntervalRepo for PostgresReminderIntervalRepo {
    async fn find_all(&self) -> Vec<ReminderInterval> {
        sqlx::query_as::<_, ReminderIntervalRaw>(
            r#"
            SELECT * FROM reminder_intervals
            ORDER BY days_before DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|interval| interval.into())
        .collect()
    }

    async fn find_by_codes(&self, codes: &[String]) -> Vec<ReminderInterval> {
        sqlx::query_as::<_, ReminderIntervalRaw>(
            r#"
            SELECT * FROM reminder_intervals
            WHERE code = ANY($1)
            "#,
        )
        .bind(codes.to_vec())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|interval| interval.into())
        .collect()
    }

    async fn find(&self, interval_id: i64) -> Option<ReminderInterval> {
        sqlx::query_as::<_, ReminderIntervalRaw>(
            r#"
            SELECT * FROM reminder_intervals
            WHERE id = $1
            "#,
        )
        .bind(interval_id)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|interval| interval.into())
    }
}
