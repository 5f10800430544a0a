use crate::shared::usecase::UseCase;
use docwatch_domain::{
    NotificationChannel, NotificationLog, NotificationStatus, ScheduledTask, User,
};
use docwatch_infra::DocwatchContext;
use std::future::Future;
use std::time::Duration;
use tracing::info;

const EMAIL_SUBJECT_PREFIX: &str = "Document Expiration Reminder";

const EMAIL_STYLE: &str = r#"
        body {
            font-family: Arial, sans-serif;
            background-color: #f4f4f4;
            margin: 0;
            padding: 0;
        }
        .container {
            background-color: #ffffff;
            margin: 50px auto;
            padding: 20px;
            border-radius: 8px;
            max-width: 600px;
        }
        h1 {
            color: #333333;
        }
        p {
            color: #555555;
            line-height: 1.6;
        }
        .footer {
            margin-top: 30px;
            font-size: 12px;
            color: #888888;
        }
    "#;

fn reminder_email_body(user_name: &str, document_name: &str, expiration: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Document Expiration Reminder</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <h1>Reminder: Your Document is Expiring Soon</h1>
        <p>Hi {user_name},</p>
        <p>This is a friendly reminder that your document "<strong>{document_name}</strong>" is set to expire on <strong>{expiration}</strong>.</p>
        <p>Please take the necessary actions to renew or update your document before the expiration date to avoid any disruptions.</p>
        <p class="footer">If you have any questions, feel free to contact our support team.</p>
    </div>
</body>
</html>
"#,
        style = EMAIL_STYLE,
        user_name = user_name,
        document_name = document_name,
        expiration = expiration,
    )
}

fn reminder_sms_body(document_name: &str, expiration: &str) -> String {
    format!(
        "Reminder: Your document '{}' is expiring on {}. Please take action to renew it.",
        document_name, expiration
    )
}

/// Executes one leased fire task: re-validates the binding and document,
/// composes the notification and pushes it through the transports.
///
/// The binding row is the idempotency authority: a task delivered twice
/// either finds `sent_at` already stamped and no-ops, or redundantly
/// re-sends, both of which are tolerated. Transport failures are per-channel
/// outcomes recorded in the notification log; only failing to reach the
/// persistence layer makes the task retryable.
#[derive(Debug)]
pub struct SendDocumentReminderUseCase {
    pub task: ScheduledTask,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Both channels were attempted; per-channel results are in the log
    Sent {
        email_sent: bool,
        sms_sent: Option<bool>,
    },
    /// Binding disabled or gone between scheduling and firing
    SkippedDisabled,
    /// Document or owner deleted since scheduling
    SkippedMissing,
    /// Redelivered task for a cycle that was already sent
    AlreadySent,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

async fn bounded<F>(timeout_millis: u64, send: F) -> anyhow::Result<String>
where
    F: Future<Output = anyhow::Result<String>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_millis), send).await {
        Ok(res) => res,
        Err(_) => Err(anyhow::anyhow!("transport call timed out")),
    }
}

impl SendDocumentReminderUseCase {
    async fn record_outcome(
        &self,
        ctx: &DocwatchContext,
        user: &User,
        channel: NotificationChannel,
        delivery: anyhow::Result<String>,
    ) -> Result<bool, UseCaseError> {
        let (status, response) = match delivery {
            Ok(response) => (NotificationStatus::Sent, response),
            Err(e) => (NotificationStatus::Failed, e.to_string()),
        };
        let entry = NotificationLog {
            id: Default::default(),
            user_id: user.id.clone(),
            document_id: self.task.document_id.clone(),
            interval_id: self.task.interval_id,
            channel,
            status,
            response,
            created: ctx.sys.get_timestamp_millis(),
        };
        ctx.repos
            .notification_log
            .insert(&entry)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(status == NotificationStatus::Sent)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDocumentReminderUseCase {
    type Response = ExecutionOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDocumentReminder";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let task = &self.task;

        // The user may have disabled the reminder after it was scheduled
        // but before it fired. Not an error.
        let binding = match ctx
            .repos
            .document_reminders
            .find(&task.document_id, task.interval_id)
            .await
        {
            Some(binding) if binding.enabled => binding,
            _ => return Ok(ExecutionOutcome::SkippedDisabled),
        };
        if binding.sent_at.is_some() {
            info!(
                "Reminder for document {} interval {} already sent this cycle, tolerating duplicate delivery",
                task.document_id, task.interval_id
            );
            return Ok(ExecutionOutcome::AlreadySent);
        }

        let document = match ctx.repos.documents.find(&task.document_id).await {
            Some(document) => document,
            None => return Ok(ExecutionOutcome::SkippedMissing),
        };
        let user = match ctx.repos.users.find(&document.user_id).await {
            Some(user) => user,
            None => return Ok(ExecutionOutcome::SkippedMissing),
        };

        let expiration = document.expiration_display();
        let subject = format!(
            "{}: {} expires {}",
            EMAIL_SUBJECT_PREFIX, document.name, expiration
        );
        let body = reminder_email_body(&user.name, &document.name, &expiration);

        let timeout_millis = ctx.config.transport_timeout_millis;
        let delivery = bounded(
            timeout_millis,
            ctx.email_service.send(&user.email, &subject, &body),
        )
        .await;
        let email_sent = self
            .record_outcome(ctx, &user, NotificationChannel::Email, delivery)
            .await?;

        // A failed email must not block the SMS and vice versa
        let mut sms_sent = None;
        if let Some(phone) = &user.phone_number {
            let message = reminder_sms_body(&document.name, &expiration);
            let delivery = bounded(timeout_millis, ctx.sms_service.send(phone, &message)).await;
            sms_sent = Some(
                self.record_outcome(ctx, &user, NotificationChannel::Sms, delivery)
                    .await?,
            );
        }

        ctx.repos
            .document_reminders
            .mark_sent(
                &task.document_id,
                task.interval_id,
                ctx.sys.get_timestamp_millis(),
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(ExecutionOutcome::Sent {
            email_sent,
            sms_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::NaiveDate;
    use chrono_tz::America::New_York;
    use docwatch_domain::{Document, DocumentReminder};
    use docwatch_infra::{setup_test_context, DocwatchContext, IEmailService, ISmsService};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub struct RecordingEmailService {
        pub sent: Mutex<Vec<(String, String, String)>>,
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

    #[derive(Default)]
    pub struct RecordingSmsService {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl ISmsService for RecordingSmsService {
        async fn send(&self, to: &str, message: &str) -> anyhow::Result<String> {
            self.sent.lock().unwrap().push((to.into(), message.into()));
            Ok("queued".into())
        }
    }

    pub struct FailingEmailService;

    #[async_trait::async_trait]
    impl IEmailService for FailingEmailService {
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("550 mailbox unavailable"))
        }
    }

    struct TestContext {
        ctx: DocwatchContext,
        email: Arc<RecordingEmailService>,
        sms: Arc<RecordingSmsService>,
        document: Document,
        task: ScheduledTask,
    }

    async fn setup(phone_number: Option<&str>) -> TestContext {
        let mut ctx = setup_test_context();
        let email = Arc::new(RecordingEmailService::default());
        let sms = Arc::new(RecordingSmsService::default());
        ctx.email_service = email.clone();
        ctx.sms_service = sms.clone();

        let user = docwatch_domain::User {
            id: Default::default(),
            email: "a@b.com".into(),
            password_hash: "hash".into(),
            name: "Ada".into(),
            phone_number: phone_number.map(|p| p.into()),
            created: 0,
            updated: 0,
        };
        ctx.repos.users.insert(&user).await.unwrap();

        let document = Document {
            id: Default::default(),
            user_id: user.id.clone(),
            name: "Passport".into(),
            description: None,
            identifier: None,
            expiration_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            timezone: New_York,
            attachment_url: None,
            created: 0,
            updated: 0,
        };
        ctx.repos.documents.insert(&document).await.unwrap();

        let binding = DocumentReminder::new(document.id.clone(), 3);
        ctx.repos.document_reminders.upsert(&binding).await.unwrap();

        let task = ScheduledTask::new(document.id.clone(), user.id.clone(), 3, 1000);

        TestContext {
            ctx,
            email,
            sms,
            document,
            task,
        }
    }

    #[actix_web::test]
    async fn sends_email_and_sms_and_stamps_sent_at() {
        let t = setup(Some("+4712345678")).await;

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Sent {
                email_sent: true,
                sms_sent: Some(true),
            }
        );

        let emails = t.email.sent.lock().unwrap();
        assert_eq!(emails.len(), 1);
        let (to, subject, body) = &emails[0];
        assert_eq!(to, "a@b.com");
        assert!(subject.contains("Passport"));
        assert!(subject.contains("Mon, 10 Mar, 2025"));
        assert!(body.contains("Mon, 10 Mar, 2025"));

        let sms = t.sms.sent.lock().unwrap();
        assert_eq!(sms.len(), 1);
        assert_eq!(sms[0].0, "+4712345678");

        let binding = t
            .ctx
            .repos
            .document_reminders
            .find(&t.document.id, 3)
            .await
            .unwrap();
        assert!(binding.sent_at.is_some());

        let log = t
            .ctx
            .repos
            .notification_log
            .find_by_document(&t.document.id)
            .await;
        assert_eq!(log.len(), 2);
        assert!(log
            .iter()
            .all(|entry| entry.status == NotificationStatus::Sent));
    }

    #[actix_web::test]
    async fn skips_sms_without_phone_number() {
        let t = setup(None).await;

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Sent {
                email_sent: true,
                sms_sent: None,
            }
        );
        assert!(t.sms.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn disabled_binding_skips_without_sending() {
        let t = setup(None).await;
        t.ctx
            .repos
            .document_reminders
            .set_enabled(&t.document.id, 3, false)
            .await
            .unwrap();

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::SkippedDisabled);
        assert!(t.email.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn deleted_document_skips_without_sending() {
        let t = setup(None).await;
        t.ctx.repos.documents.delete(&t.document.id).await.unwrap();

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::SkippedMissing);
        assert!(t.email.sent.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn duplicate_delivery_is_tolerated_without_resending() {
        let t = setup(None).await;

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        execute(usecase, &t.ctx).await.unwrap();

        // At-least-once delivery handed us the same task again
        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::AlreadySent);

        assert_eq!(t.email.sent.lock().unwrap().len(), 1);
        let sent_entries = t
            .ctx
            .repos
            .notification_log
            .find_by_document(&t.document.id)
            .await
            .into_iter()
            .filter(|entry| entry.status == NotificationStatus::Sent)
            .count();
        assert_eq!(sent_entries, 1);
    }

    #[actix_web::test]
    async fn email_failure_does_not_block_sms_or_fail_the_task() {
        let mut t = setup(Some("+4712345678")).await;
        t.ctx.email_service = Arc::new(FailingEmailService);

        let usecase = SendDocumentReminderUseCase {
            task: t.task.clone(),
        };
        let outcome = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(
            outcome,
            ExecutionOutcome::Sent {
                email_sent: false,
                sms_sent: Some(true),
            }
        );

        assert_eq!(t.sms.sent.lock().unwrap().len(), 1);

        let log = t
            .ctx
            .repos
            .notification_log
            .find_by_document(&t.document.id)
            .await;
        assert_eq!(log.len(), 2);
        assert!(log.iter().any(|entry| {
            entry.channel == NotificationChannel::Email
                && entry.status == NotificationStatus::Failed
        }));
        assert!(log.iter().any(|entry| {
            entry.channel == NotificationChannel::Sms && entry.status == NotificationStatus::Sent
        }));

        // The task itself still succeeded and sent_at is stamped
        let binding = t
            .ctx
            .repos
            .document_reminders
            .find(&t.document.id, 3)
            .await
            .unwrap();
        assert!(binding.sent_at.is_some());
    }
}
