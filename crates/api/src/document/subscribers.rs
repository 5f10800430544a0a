use super::create_document::CreateDocumentUseCase;
use super::sync_document_reminders::SyncDocumentRemindersUseCase;
use super::update_document::UpdateDocumentUseCase;
use crate::shared::usecase::{execute, Subscriber};
use docwatch_domain::{Document, ReminderInterval};
use docwatch_infra::DocwatchContext;
use tracing::error;

pub struct ScheduleRemindersOnDocumentCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateDocumentUseCase> for ScheduleRemindersOnDocumentCreated {
    async fn notify(&self, e: &(Document, Vec<ReminderInterval>), ctx: &DocwatchContext) {
        let usecase = SyncDocumentRemindersUseCase {
            document: &e.0,
            intervals: &e.1,
            expiration_changed: false,
        };
        if execute(usecase, ctx).await.is_err() {
            error!("Unable to schedule reminders for created document: {}", e.0.id);
        }
    }
}

pub struct SyncRemindersOnDocumentUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateDocumentUseCase> for SyncRemindersOnDocumentUpdated {
    async fn notify(
        &self,
        e: &super::update_document::UseCaseRes,
        ctx: &DocwatchContext,
    ) {
        let usecase = SyncDocumentRemindersUseCase {
            document: &e.document,
            intervals: &e.intervals,
            expiration_changed: e.expiration_changed,
        };
        if execute(usecase, ctx).await.is_err() {
            error!(
                "Unable to sync reminders for updated document: {}",
                e.document.id
            );
        }
    }
}
