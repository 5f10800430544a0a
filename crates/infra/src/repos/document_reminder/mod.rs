mod inmemory;
mod postgres;

pub use inmemory::InMemoryDocumentReminderRepo;
pub use postgres::PostgresDocumentReminderRepo;

use crate::repos::shared::repo::DeleteResult;
use docwatch_domain::{DocumentReminder, ID};

/// Store of `DocumentReminder` bindings. The binding row is the
/// idempotency authority for the executor: `sent_at` decides whether a
/// redelivered task re-sends, and `set_enabled` always clears it.
#[async_trait::async_trait]
pub trait IDocumentReminderRepo: Send + Sync {
    /// Inserts or replaces the binding for its (document, interval) pair.
    async fn upsert(&self, reminder: &DocumentReminder) -> anyhow::Result<()>;
    async fn find(&self, document_id: &ID, interval_id: i64) -> Option<DocumentReminder>;
    async fn find_by_document(&self, document_id: &ID) -> Vec<DocumentReminder>;
    /// Flips the enabled flag and clears `sent_at`. Returns whether a
    /// binding existed.
    async fn set_enabled(
        &self,
        document_id: &ID,
        interval_id: i64,
        enabled: bool,
    ) -> anyhow::Result<bool>;
    async fn mark_sent(
        &self,
        document_id: &ID,
        interval_id: i64,
        sent_at: i64,
    ) -> anyhow::Result<()>;
    /// Clears `sent_at` on every binding of the document; used when the
    /// expiration date changes so a stale flag never suppresses the new
    /// cycle.
    async fn clear_sent_by_document(&self, document_id: &ID) -> anyhow::Result<()>;
    async fn delete_by_document(&self, document_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_context;

    #[tokio::test]
    async fn upsert_keeps_one_binding_per_pair() {
        let ctx = setup_test_context();
        let document_id = ID::default();

        let binding = DocumentReminder::new(document_id.clone(), 3);
        ctx.repos.document_reminders.upsert(&binding).await.unwrap();

        let mut replacement = DocumentReminder::new(document_id.clone(), 3);
        replacement.enabled = false;
        ctx.repos
            .document_reminders
            .upsert(&replacement)
            .await
            .unwrap();

        let bindings = ctx
            .repos
            .document_reminders
            .find_by_document(&document_id)
            .await;
        assert_eq!(bindings.len(), 1);
        assert!(!bindings[0].enabled);
    }

    #[tokio::test]
    async fn set_enabled_clears_sent_at() {
        let ctx = setup_test_context();
        let document_id = ID::default();

        let binding = DocumentReminder::new(document_id.clone(), 3);
        ctx.repos.document_reminders.upsert(&binding).await.unwrap();
        ctx.repos
            .document_reminders
            .mark_sent(&document_id, 3, 12345)
            .await
            .unwrap();

        let found = ctx
            .repos
            .document_reminders
            .find(&document_id, 3)
            .await
            .unwrap();
        assert_eq!(found.sent_at, Some(12345));

        let existed = ctx
            .repos
            .document_reminders
            .set_enabled(&document_id, 3, true)
            .await
            .unwrap();
        assert!(existed);

        let found = ctx
            .repos
            .document_reminders
            .find(&document_id, 3)
            .await
            .unwrap();
        assert_eq!(found.sent_at, None);

        let existed = ctx
            .repos
            .document_reminders
            .set_enabled(&document_id, 99, false)
            .await
            .unwrap();
        assert!(!existed);
    }
}
