use super::INotificationLogRepo;
use crate::repos::shared::inmemory_repo::*;
use docwatch_domain::{NotificationLog, ID};

pub struct InMemoryNotificationLogRepo {
    entries: std::sync::Mutex<Vec<NotificationLog>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn insert(&self, entry: &NotificationLog) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn find_by_document(&self, document_id: &ID) -> Vec<NotificationLog> {
        find_by(&self.entries, |e| e.document_id == *document_id)
    }
}
