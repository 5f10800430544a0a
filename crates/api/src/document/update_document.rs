use super::subscribers::SyncRemindersOnDocumentUpdated;
use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use chrono_tz::Tz;
use docwatch_api_structs::update_document::*;
use docwatch_domain::{Document, ReminderInterval, User, ID};
use docwatch_infra::DocwatchContext;

pub async fn update_document_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateDocumentUseCase {
        user,
        document_id: path_params.document_id.clone(),
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
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.document, res.intervals)))
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct UpdateDocumentUseCase {
    pub user: User,
    pub document_id: ID,
    pub name: Option<String>,
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub timezone: Option<String>,
    pub attachment_url: Option<String>,
    /// Full replacement set of interval codes; `None` keeps the current
    /// enabled set
    pub reminders: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub document: Document,
    /// The enabled intervals after the update
    pub intervals: Vec<ReminderInterval>,
    pub expiration_changed: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTimezone(String),
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(document_id) => Self::NotFound(format!(
                "The document with id: {}, was not found.",
                document_id
            )),
            UseCaseError::InvalidTimezone(timezone) => Self::BadClientData(format!(
                "Invalid timezone provided: {}, it should be a valid IANA TimeZone.",
                timezone
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateDocumentUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateDocument";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let mut document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) if document.user_id == self.user.id => document,
            _ => return Err(UseCaseError::NotFound(self.document_id.clone())),
        };

        if let Some(name) = &self.name {
            document.name = name.clone();
        }
        if let Some(description) = &self.description {
            document.description = Some(description.clone());
        }
        if let Some(identifier) = &self.identifier {
            document.identifier = Some(identifier.clone());
        }
        if let Some(attachment_url) = &self.attachment_url {
            document.attachment_url = Some(attachment_url.clone());
        }
        if let Some(timezone) = &self.timezone {
            document.timezone = timezone
                .parse::<Tz>()
                .map_err(|_| UseCaseError::InvalidTimezone(timezone.clone()))?;
        }
        let expiration_changed = match self.expiration_date {
            Some(expiration_date) if expiration_date != document.expiration_date => {
                document.expiration_date = expiration_date;
                true
            }
            _ => false,
        };
        document.updated = ctx.sys.get_timestamp_millis();

        let intervals = match &self.reminders {
            Some(codes) => ctx.repos.reminder_intervals.find_by_codes(codes).await,
            None => {
                // Keep the currently enabled set
                let bindings = ctx
                    .repos
                    .document_reminders
                    .find_by_document(&document.id)
                    .await;
                let mut intervals = Vec::new();
                for binding in bindings.iter().filter(|b| b.enabled) {
                    if let Some(interval) =
                        ctx.repos.reminder_intervals.find(binding.interval_id).await
                    {
                        intervals.push(interval);
                    }
                }
                intervals
            }
        };

        ctx.repos
            .documents
            .save(&document)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes {
            document,
            intervals,
            expiration_changed,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnDocumentUpdated)]
    }
}
