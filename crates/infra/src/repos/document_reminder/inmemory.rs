use super::IDocumentReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use docwatch_domain::{DocumentReminder, ID};

pub struct InMemoryDocumentReminderRepo {
    reminders: std::sync::Mutex<Vec<DocumentReminder>>,
}

impl InMemoryDocumentReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IDocumentReminderRepo for InMemoryDocumentReminderRepo {
    async fn upsert(&self, reminder: &DocumentReminder) -> anyhow::Result<()> {
        find_and_delete_by(&self.reminders, |r| {
            r.document_id == reminder.document_id && r.interval_id == reminder.interval_id
        });
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, document_id: &ID, interval_id: i64) -> Option<DocumentReminder> {
        let mut found = find_by(&self.reminders, |r| {
            r.document_id == *document_id && r.interval_id == interval_id
        });
        if found.is_empty() {
            return None;
        }
        Some(found.remove(0))
    }

    async fn find_by_document(&self, document_id: &ID) -> Vec<DocumentReminder> {
        find_by(&self.reminders, |r| r.document_id == *document_id)
    }

    async fn set_enabled(
        &self,
        document_id: &ID,
        interval_id: i64,
        enabled: bool,
    ) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.reminders,
            |r| r.document_id == *document_id && r.interval_id == interval_id,
            |r| {
                r.enabled = enabled;
                r.sent_at = None;
            },
        );
        Ok(updated > 0)
    }

    async fn mark_sent(
        &self,
        document_id: &ID,
        interval_id: i64,
        sent_at: i64,
    ) -> anyhow::Result<()> {
        update_many(
            &self.reminders,
            |r| r.document_id == *document_id && r.interval_id == interval_id,
            |r| r.sent_at = Some(sent_at),
        );
        Ok(())
    }

    async fn clear_sent_by_document(&self, document_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.reminders,
            |r| r.document_id == *document_id,
            |r| r.sent_at = None,
        );
        Ok(())
    }

    async fn delete_by_document(&self, document_id: &ID) -> anyhow::Result<DeleteResult> {
        let deleted = find_and_delete_by(&self.reminders, |r| r.document_id == *document_id);
        Ok(DeleteResult {
            deleted_count: deleted.len() as i64,
        })
    }
}
