mod document;
mod document_reminder;
mod interval;
mod notification_log;
mod scheduled_task;
mod shared;
mod user;

use document::{InMemoryDocumentRepo, PostgresDocumentRepo};
use document_reminder::{InMemoryDocumentReminderRepo, PostgresDocumentReminderRepo};
use interval::{InMemoryReminderIntervalRepo, PostgresReminderIntervalRepo};
use notification_log::{InMemoryNotificationLogRepo, PostgresNotificationLogRepo};
use scheduled_task::{InMemoryScheduledTaskRepo, PostgresScheduledTaskRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use user::{InMemoryUserRepo, PostgresUserRepo};

pub use document::IDocumentRepo;
pub use document_reminder::IDocumentReminderRepo;
pub use interval::IReminderIntervalRepo;
pub use notification_log::INotificationLogRepo;
pub use scheduled_task::IScheduledTaskRepo;
pub use shared::repo::DeleteResult;
pub use user::IUserRepo;

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub documents: Arc<dyn IDocumentRepo>,
    pub reminder_intervals: Arc<dyn IReminderIntervalRepo>,
    pub document_reminders: Arc<dyn IDocumentReminderRepo>,
    pub scheduled_tasks: Arc<dyn IScheduledTaskRepo>,
    pub notification_log: Arc<dyn INotificationLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            documents: Arc::new(PostgresDocumentRepo::new(pool.clone())),
            reminder_intervals: Arc::new(PostgresReminderIntervalRepo::new(pool.clone())),
            document_reminders: Arc::new(PostgresDocumentReminderRepo::new(pool.clone())),
            scheduled_tasks: Arc::new(PostgresScheduledTaskRepo::new(pool.clone())),
            notification_log: Arc::new(PostgresNotificationLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            documents: Arc::new(InMemoryDocumentRepo::new()),
            reminder_intervals: Arc::new(InMemoryReminderIntervalRepo::new()),
            document_reminders: Arc::new(InMemoryDocumentReminderRepo::new()),
            scheduled_tasks: Arc::new(InMemoryScheduledTaskRepo::new()),
            notification_log: Arc::new(InMemoryNotificationLogRepo::new()),
        }
    }
}
