use super::subscribers::ScheduleRemindersOnDocumentCreated;
use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use chrono_tz::Tz;
use docwatch_api_structs::create_document::*;
use docwatch_domain::{Document, ReminderInterval, User};
use docwatch_infra::DocwatchContext;

pub async fn create_document_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateDocumentUseCase {
        user,
        name: body.name,
        description: body.description,
        identifier: body.identifier,
        expiration_date: body.expiration_date,
        timezone: body.timezone,
        attachment_url: body.attachment_url,
        reminders: body.reminders,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.0, res.1)))
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct CreateDocumentUseCase {
    pub user: User,
    pub name: String,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub expiration_date: NaiveDate,
    /// IANA timezone name; unknown zones are a validation error, never
    /// silently defaulted
    pub timezone: String,
    pub attachment_url: Option<String>,
    /// Requested interval codes; unknown codes are silently dropped
    pub reminders: Vec<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyName,
    InvalidTimezone(String),
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyName => Self::BadClientData("Document name is required".into()),
            UseCaseError::InvalidTimezone(timezone) => Self::BadClientData(format!(
                "Invalid timezone provided: {}, it should be a valid IANA TimeZone.",
                timezone
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateDocumentUseCase {
    type Response = (Document, Vec<ReminderInterval>);

    type Error = UseCaseError;

    const NAME: &'static str = "CreateDocument";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        if self.name.trim().is_empty() {
            return Err(UseCaseError::EmptyName);
        }
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| UseCaseError::InvalidTimezone(self.timezone.clone()))?;

        let now = ctx.sys.get_timestamp_millis();
        let document = Document {
            id: Default::default(),
            user_id: self.user.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            identifier: self.identifier.clone(),
            expiration_date: self.expiration_date,
            timezone,
            attachment_url: self.attachment_url.clone(),
            created: now,
            updated: now,
        };

        let intervals = ctx
            .repos
            .reminder_intervals
            .find_by_codes(&self.reminders)
            .await;

        ctx.repos
            .documents
            .insert(&document)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok((document, intervals))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleRemindersOnDocumentCreated)]
    }
}
