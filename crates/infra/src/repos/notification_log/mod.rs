mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;

use docwatch_domain::{NotificationLog, ID};

/// Append-only sink for delivery outcomes. The scheduling core writes here
/// and never reads it back for decisions.
#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn insert(&self, entry: &NotificationLog) -> anyhow::Result<()>;
    async fn find_by_document(&self, document_id: &ID) -> Vec<NotificationLog>;
}
