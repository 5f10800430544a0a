use crate::shared::usecase::UseCase;
use docwatch_domain::{scheduling, Document, DocumentReminder, ReminderInterval, ScheduledTask};
use docwatch_infra::DocwatchContext;

/// Reconciles a document's reminder bindings and queued fire tasks with a
/// desired set of enabled intervals.
///
/// Bindings dropped from the set are disabled, not deleted, and their
/// pending task is cancelled. Every kept interval is re-scheduled
/// cancel-first so a binding never has more than one outstanding task, no
/// matter how often the document is edited. Fire instants at or before now
/// are elapsed for this cycle and simply not queued.
#[derive(Debug)]
pub struct SyncDocumentRemindersUseCase<'a> {
    pub document: &'a Document,
    /// Intervals that should be enabled after the sync
    pub intervals: &'a [ReminderInterval],
    /// Whether this sync is for a changed expiration date, which starts a
    /// new cycle and clears the sent flags
    pub expiration_changed: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl<'a> UseCase for SyncDocumentRemindersUseCase<'a> {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SyncDocumentReminders";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let document = self.document;

        if self.expiration_changed {
            ctx.repos
                .document_reminders
                .clear_sent_by_document(&document.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        let existing = ctx
            .repos
            .document_reminders
            .find_by_document(&document.id)
            .await;
        let enabled_ids: Vec<i64> = self.intervals.iter().map(|i| i.id).collect();

        // Bindings no longer requested: disable and drop their queued task
        for binding in existing
            .iter()
            .filter(|b| b.enabled && !enabled_ids.contains(&b.interval_id))
        {
            ctx.repos
                .document_reminders
                .set_enabled(&document.id, binding.interval_id, false)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            ctx.queue
                .cancel(&document.id, binding.interval_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        let now = ctx.sys.get_timestamp_millis();
        for interval in self.intervals {
            match existing.iter().find(|b| b.interval_id == interval.id) {
                Some(binding) if binding.enabled => {}
                Some(_) => {
                    ctx.repos
                        .document_reminders
                        .set_enabled(&document.id, interval.id, true)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                }
                None => {
                    let binding = DocumentReminder::new(document.id.clone(), interval.id);
                    ctx.repos
                        .document_reminders
                        .upsert(&binding)
                        .await
                        .map_err(|_| UseCaseError::StorageError)?;
                }
            }

            // Cancel-before-reschedule keeps at most one outstanding task
            // per binding
            ctx.queue
                .cancel(&document.id, interval.id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;

            let fire_at = scheduling::compute_fire_instant(
                document.expiration_date,
                document.timezone,
                interval.days_before,
            );
            if fire_at <= now {
                // The window already passed when the document was entered
                continue;
            }

            let task = ScheduledTask::new(
                document.id.clone(),
                document.user_id.clone(),
                interval.id,
                fire_at,
            );
            ctx.queue
                .schedule(task)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::America::New_York;
    use docwatch_domain::ID;
    use docwatch_infra::{setup_test_context, DocwatchContext, ISys};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    fn millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn document_factory() -> Document {
        Document {
            id: Default::default(),
            user_id: ID::default(),
            name: "Passport".into(),
            description: None,
            identifier: None,
            expiration_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            timezone: New_York,
            attachment_url: None,
            created: 0,
            updated: 0,
        }
    }

    async fn setup() -> (DocwatchContext, Document, Vec<ReminderInterval>) {
        let mut ctx = setup_test_context();
        // Mar 1 2025, before every fire instant of the document
        ctx.sys = Arc::new(StaticTimeSys(millis(2025, 3, 1, 0)));
        let document = document_factory();
        ctx.repos.documents.insert(&document).await.unwrap();
        let intervals = ctx
            .repos
            .reminder_intervals
            .find_by_codes(&["7d".to_string()])
            .await;
        (ctx, document, intervals)
    }

    #[actix_web::test]
    async fn schedules_one_task_per_enabled_interval() {
        let (ctx, document, intervals) = setup().await;

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &intervals,
            expiration_changed: false,
        };
        execute(usecase, &ctx).await.unwrap();

        let task = ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document.id, intervals[0].id)
            .await
            .unwrap();
        // Local midnight Mar 3 in New York, EST
        assert_eq!(task.run_at, millis(2025, 3, 3, 5));

        let bindings = ctx
            .repos
            .document_reminders
            .find_by_document(&document.id)
            .await;
        assert_eq!(bindings.len(), 1);
        assert!(bindings[0].enabled);
        assert_eq!(bindings[0].sent_at, None);
    }

    #[actix_web::test]
    async fn resyncing_does_not_duplicate_tasks() {
        let (ctx, document, intervals) = setup().await;

        for _ in 0..3 {
            let usecase = SyncDocumentRemindersUseCase {
                document: &document,
                intervals: &intervals,
                expiration_changed: false,
            };
            execute(usecase, &ctx).await.unwrap();
        }

        // Exactly one task is due at the fire instant
        let due = ctx.queue.lease_due(millis(2025, 3, 3, 5)).await;
        assert_eq!(due.len(), 1);
    }

    #[actix_web::test]
    async fn dropped_intervals_are_disabled_and_their_tasks_cancelled() {
        let (ctx, document, intervals) = setup().await;

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &intervals,
            expiration_changed: false,
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &[],
            expiration_changed: false,
        };
        execute(usecase, &ctx).await.unwrap();

        let bindings = ctx
            .repos
            .document_reminders
            .find_by_document(&document.id)
            .await;
        assert_eq!(bindings.len(), 1);
        assert!(!bindings[0].enabled);

        assert!(ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document.id, intervals[0].id)
            .await
            .is_none());
        assert!(ctx.queue.lease_due(millis(2025, 3, 3, 5)).await.is_empty());
    }

    #[actix_web::test]
    async fn expiration_change_reschedules_and_clears_sent_flags() {
        let (ctx, mut document, intervals) = setup().await;

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &intervals,
            expiration_changed: false,
        };
        execute(usecase, &ctx).await.unwrap();

        ctx.repos
            .document_reminders
            .mark_sent(&document.id, intervals[0].id, millis(2025, 3, 1, 0))
            .await
            .unwrap();

        document.expiration_date = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        ctx.repos.documents.save(&document).await.unwrap();

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &intervals,
            expiration_changed: true,
        };
        execute(usecase, &ctx).await.unwrap();

        let task = ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document.id, intervals[0].id)
            .await
            .unwrap();
        // Apr 3 is EDT, UTC-4
        assert_eq!(task.run_at, millis(2025, 4, 3, 4));

        let binding = ctx
            .repos
            .document_reminders
            .find(&document.id, intervals[0].id)
            .await
            .unwrap();
        assert_eq!(binding.sent_at, None);

        // Only the new occurrence is outstanding
        assert!(ctx.queue.lease_due(millis(2025, 3, 3, 5)).await.is_empty());
    }

    #[actix_web::test]
    async fn elapsed_occurrences_are_skipped_not_scheduled() {
        let (mut ctx, mut document, _) = setup().await;
        // The document was entered long after its expiration
        ctx.sys = Arc::new(StaticTimeSys(millis(2025, 6, 1, 0)));
        document.expiration_date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let intervals = ctx
            .repos
            .reminder_intervals
            .find_by_codes(&["0d".to_string()])
            .await;

        let usecase = SyncDocumentRemindersUseCase {
            document: &document,
            intervals: &intervals,
            expiration_changed: false,
        };
        // Not an error, the occurrence is silently skipped
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document.id, intervals[0].id)
            .await
            .is_none());

        // The binding still exists for future cycles
        let binding = ctx
            .repos
            .document_reminders
            .find(&document.id, intervals[0].id)
            .await
            .unwrap();
        assert!(binding.enabled);
    }
}
