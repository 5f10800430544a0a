use crate::shared::entity::{Entity, ID};

/// A `DocumentReminder` binds one `Document` to one `ReminderInterval`.
///
/// Removing an interval from a document disables the binding instead of
/// deleting it, so the owner's choices survive edits. `sent_at` records the
/// last successful delivery for the current expiration date and is cleared
/// whenever the binding is (re-)enabled or the expiration date changes; a
/// stale flag must never suppress a reminder for a new expiration cycle.
///
/// There is at most one binding per (document, interval) pair.
#[derive(Debug, Clone)]
pub struct DocumentReminder {
    pub id: ID,
    pub document_id: ID,
    pub interval_id: i64,
    pub enabled: bool,
    pub sent_at: Option<i64>,
}

impl DocumentReminder {
    pub fn new(document_id: ID, interval_id: i64) -> Self {
        Self {
            id: Default::default(),
            document_id,
            interval_id,
            enabled: true,
            sent_at: None,
        }
    }
}

impl Entity for DocumentReminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
