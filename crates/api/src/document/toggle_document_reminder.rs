use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::dtos::DocumentReminderDTO;
use docwatch_api_structs::toggle_document_reminder::*;
use docwatch_domain::{scheduling, ReminderInterval, ScheduledTask, User, ID};
use docwatch_infra::DocwatchContext;

pub async fn toggle_document_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = ToggleDocumentReminderUseCase {
        user,
        document_id: path_params.document_id.clone(),
        code: body.code,
        enabled: body.enabled,
    };

    execute(usecase, &ctx)
        .await
        .map(|(interval, enabled)| {
            HttpResponse::Ok().json(APIResponse {
                reminder: DocumentReminderDTO::new(interval, enabled),
            })
        })
        .map_err(DocwatchError::from)
}

/// Flips one reminder binding on or off.
///
/// Turning a binding off cancels its queued fire task; the naive
/// alternative of leaving the task queued and filtering at send time is
/// exactly the duplicate-notification bug this service exists to avoid.
/// Turning it back on clears `sent_at` and schedules the next future
/// occurrence, if any.
#[derive(Debug)]
pub struct ToggleDocumentReminderUseCase {
    pub user: User,
    pub document_id: ID,
    pub code: String,
    pub enabled: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    DocumentNotFound(ID),
    IntervalNotFound(String),
    BindingNotFound(String),
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::DocumentNotFound(document_id) => Self::NotFound(format!(
                "The document with id: {}, was not found.",
                document_id
            )),
            UseCaseError::IntervalNotFound(code) => Self::NotFound(format!(
                "The reminder interval with code: {}, was not found.",
                code
            )),
            UseCaseError::BindingNotFound(code) => Self::NotFound(format!(
                "The document has no reminder with code: {}.",
                code
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ToggleDocumentReminderUseCase {
    type Response = (ReminderInterval, bool);

    type Error = UseCaseError;

    const NAME: &'static str = "ToggleDocumentReminder";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) if document.user_id == self.user.id => document,
            _ => return Err(UseCaseError::DocumentNotFound(self.document_id.clone())),
        };

        let mut intervals = ctx
            .repos
            .reminder_intervals
            .find_by_codes(&[self.code.clone()])
            .await;
        if intervals.is_empty() {
            return Err(UseCaseError::IntervalNotFound(self.code.clone()));
        }
        let interval = intervals.remove(0);

        let existed = ctx
            .repos
            .document_reminders
            .set_enabled(&document.id, interval.id, self.enabled)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !existed {
            return Err(UseCaseError::BindingNotFound(self.code.clone()));
        }

        ctx.queue
            .cancel(&document.id, interval.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if self.enabled {
            let fire_at = scheduling::compute_fire_instant(
                document.expiration_date,
                document.timezone,
                interval.days_before,
            );
            if fire_at > ctx.sys.get_timestamp_millis() {
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
        }

        Ok((interval, self.enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::create_document::CreateDocumentUseCase;
    use chrono::NaiveDate;
    use docwatch_infra::setup_test_context;

    async fn setup() -> (DocwatchContext, User, ID, ReminderInterval) {
        let ctx = setup_test_context();
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
            expiration_date: NaiveDate::from_ymd_opt(2099, 3, 10).unwrap(),
            timezone: "America/New_York".into(),
            attachment_url: None,
            reminders: vec!["7d".into()],
        };
        let (document, mut intervals) = execute(usecase, &ctx).await.unwrap();
        (ctx, user, document.id, intervals.remove(0))
    }

    #[actix_web::test]
    async fn disabling_cancels_the_queued_task() {
        let (ctx, user, document_id, interval) = setup().await;
        assert!(ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document_id, interval.id)
            .await
            .is_some());

        let usecase = ToggleDocumentReminderUseCase {
            user,
            document_id: document_id.clone(),
            code: "7d".into(),
            enabled: false,
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document_id, interval.id)
            .await
            .is_none());
        let binding = ctx
            .repos
            .document_reminders
            .find(&document_id, interval.id)
            .await
            .unwrap();
        assert!(!binding.enabled);
    }

    #[actix_web::test]
    async fn reenabling_clears_sent_at_and_schedules_again() {
        let (ctx, user, document_id, interval) = setup().await;

        ctx.repos
            .document_reminders
            .mark_sent(&document_id, interval.id, 123)
            .await
            .unwrap();

        let usecase = ToggleDocumentReminderUseCase {
            user: user.clone(),
            document_id: document_id.clone(),
            code: "7d".into(),
            enabled: false,
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = ToggleDocumentReminderUseCase {
            user,
            document_id: document_id.clone(),
            code: "7d".into(),
            enabled: true,
        };
        execute(usecase, &ctx).await.unwrap();

        let binding = ctx
            .repos
            .document_reminders
            .find(&document_id, interval.id)
            .await
            .unwrap();
        assert!(binding.enabled);
        assert_eq!(binding.sent_at, None);
        assert!(ctx
            .repos
            .scheduled_tasks
            .find_by_binding(&document_id, interval.id)
            .await
            .is_some());
    }

    #[actix_web::test]
    async fn unknown_code_and_unbound_interval_are_not_found() {
        let (ctx, user, document_id, _) = setup().await;

        let usecase = ToggleDocumentReminderUseCase {
            user: user.clone(),
            document_id: document_id.clone(),
            code: "99d".into(),
            enabled: true,
        };
        assert!(matches!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::IntervalNotFound(_)
        ));

        // "1d" exists in the catalog but was never requested for this
        // document
        let usecase = ToggleDocumentReminderUseCase {
            user,
            document_id,
            code: "1d".into(),
            enabled: true,
        };
        assert!(matches!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::BindingNotFound(_)
        ));
    }
}
