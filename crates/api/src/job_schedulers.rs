use crate::document::send_document_reminder::SendDocumentReminderUseCase;
use crate::shared::usecase::execute;
use docwatch_domain::{ScheduledTask, TaskStatus};
use docwatch_infra::DocwatchContext;
use std::time::Duration;
use tracing::{debug, error};

/// Starts the background loop that leases due reminder tasks and hands each
/// one to the executor. Runs apart from the request path; enqueueing from a
/// request is fire-and-forget and never waits on this loop.
pub fn start_reminder_dispatch_job(ctx: DocwatchContext) {
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(
            ctx.queue.config().poll_interval_secs,
        ));
        loop {
            interval.tick().await;

            let now = ctx.sys.get_timestamp_millis();
            // Tasks overdue from downtime are still delivered; the executor
            // decides whether a late reminder is worth sending (it is).
            let tasks = ctx.queue.lease_due(now).await;
            for task in tasks {
                let context = ctx.clone();
                actix_web::rt::spawn(dispatch_task(context, task));
            }
        }
    });
}

/// Delivers one leased task to the executor and settles its fate:
/// acknowledged on success, back to pending with backoff on a retryable
/// failure, failed for good once attempts run out.
pub(crate) async fn dispatch_task(ctx: DocwatchContext, task: ScheduledTask) {
    let usecase = SendDocumentReminderUseCase { task: task.clone() };
    match execute(usecase, &ctx).await {
        Ok(outcome) => {
            debug!("Reminder task {} finished: {:?}", task.id, outcome);
            if let Err(e) = ctx.queue.ack(&task.id).await {
                // The lease will expire and the task be redelivered; the
                // executor dedups on sent_at
                error!("Unable to acknowledge reminder task {}: {:?}", task.id, e);
            }
        }
        Err(e) => {
            let now = ctx.sys.get_timestamp_millis();
            match ctx.queue.retry(&task, now).await {
                Ok(TaskStatus::Failed) => {
                    error!(
                        "Reminder task {} for document {} exhausted its retries: {:?}",
                        task.id, task.document_id, e
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Unable to retry reminder task {}: {:?}", task.id, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::create_document::CreateDocumentUseCase;
    use crate::document::toggle_document_reminder::ToggleDocumentReminderUseCase;
    use chrono::{NaiveDate, TimeZone, Utc};
    use docwatch_domain::User;
    use docwatch_infra::{setup_test_context, IEmailService, ISys};
    use std::sync::{Arc, Mutex};

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingEmailService {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait::async_trait]
    impl IEmailService for RecordingEmailService {
        async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<String> {
            self.sent
                .lock()
                .unwrap()
                .push((to.into(), subject.into(), body.into()));
            Ok("250 OK".into())
        }
    }

    fn millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[actix_web::test]
    async fn delivers_the_reminder_at_the_computed_fire_instant() {
        let mut ctx = setup_test_context();
        let email = Arc::new(RecordingEmailService::default());
        ctx.email_service = email.clone();
        ctx.sys = Arc::new(StaticTimeSys(millis(2025, 3, 1, 0)));

        let user = User {
            id: Default::default(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            name: "Ada".into(),
            phone_number: None,
            created: 0,
            updated: 0,
        };
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateDocumentUseCase {
            user: user.clone(),
            name: "Passport".into(),
            description: None,
            identifier: None,
            expiration_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            timezone: "America/New_York".into(),
            attachment_url: None,
            reminders: vec!["7d".into()],
        };
        let (document, intervals) = execute(usecase, &ctx).await.unwrap();

        let fire_at = millis(2025, 3, 3, 5);
        let task = ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document.id, intervals[0].id)
            .await
            .unwrap();
        assert_eq!(task.run_at, fire_at);

        // Not due one second early
        assert!(ctx.queue.lease_due(fire_at - 1000).await.is_empty());

        // The clock reaches the fire instant
        ctx.sys = Arc::new(StaticTimeSys(fire_at));
        let due = ctx.queue.lease_due(fire_at).await;
        assert_eq!(due.len(), 1);
        dispatch_task(ctx.clone(), due[0].clone()).await;

        let emails = email.sent.lock().unwrap();
        assert_eq!(emails.len(), 1);
        let (to, subject, _body) = &emails[0];
        assert_eq!(to, "a@b.com");
        assert!(subject.contains("Passport"));
        assert!(subject.contains("Mon, 10 Mar, 2025"));
        drop(emails);

        // Acknowledged, nothing left to deliver
        let found = ctx.repos.scheduled_tasks.find(&due[0].id).await.unwrap();
        assert_eq!(found.status, TaskStatus::Delivered);
        assert!(ctx.queue.lease_due(fire_at + 60_000).await.is_empty());
    }

    #[actix_web::test]
    async fn disabled_after_scheduling_means_no_send() {
        let mut ctx = setup_test_context();
        let email = Arc::new(RecordingEmailService::default());
        ctx.email_service = email.clone();
        ctx.sys = Arc::new(StaticTimeSys(millis(2025, 3, 1, 0)));

        let user = User {
            id: Default::default(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            name: "Ada".into(),
            phone_number: None,
            created: 0,
            updated: 0,
        };
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = CreateDocumentUseCase {
            user: user.clone(),
            name: "Passport".into(),
            description: None,
            identifier: None,
            expiration_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            timezone: "America/New_York".into(),
            attachment_url: None,
            reminders: vec!["7d".into()],
        };
        let (document, _) = execute(usecase, &ctx).await.unwrap();

        let usecase = ToggleDocumentReminderUseCase {
            user,
            document_id: document.id.clone(),
            code: "7d".into(),
            enabled: false,
        };
        execute(usecase, &ctx).await.unwrap();

        // Advance past the fire instant: the task is gone from the queue
        let fire_at = millis(2025, 3, 3, 5);
        ctx.sys = Arc::new(StaticTimeSys(fire_at));
        assert!(ctx.queue.lease_due(fire_at).await.is_empty());
        assert!(email.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn skipped_tasks_are_still_acknowledged() {
        let ctx = setup_test_context();

        // A task whose binding never existed, e.g. document wiped between
        // scheduling and firing
        let task = ScheduledTask::new(Default::default(), Default::default(), 3, 100);
        ctx.repos.scheduled_tasks.insert(&task).await.unwrap();
        let due = ctx.queue.lease_due(100).await;
        assert_eq!(due.len(), 1);

        dispatch_task(ctx.clone(), due[0].clone()).await;

        let found = ctx.repos.scheduled_tasks.find(&task.id).await.unwrap();
        assert_eq!(found.status, TaskStatus::Delivered);
    }
}
