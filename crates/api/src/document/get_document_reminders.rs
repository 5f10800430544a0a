use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::dtos::DocumentReminderDTO;
use docwatch_api_structs::get_document_reminders::*;
use docwatch_domain::{Document, ReminderInterval, User, ID};
use docwatch_infra::DocwatchContext;

pub async fn get_document_reminders_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetDocumentRemindersUseCase {
        user,
        document_id: path_params.document_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                document_id: res.document.id.clone(),
                name: res.document.name.clone(),
                reminders: res
                    .reminders
                    .into_iter()
                    .map(|(interval, enabled)| DocumentReminderDTO::new(interval, enabled))
                    .collect(),
            })
        })
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct GetDocumentRemindersUseCase {
    pub user: User,
    pub document_id: ID,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub document: Document,
    pub reminders: Vec<(ReminderInterval, bool)>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(document_id) => Self::NotFound(format!(
                "The document with id: {}, was not found.",
                document_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDocumentRemindersUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDocumentReminders";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) if document.user_id == self.user.id => document,
            _ => return Err(UseCaseError::NotFound(self.document_id.clone())),
        };

        let bindings = ctx
            .repos
            .document_reminders
            .find_by_document(&document.id)
            .await;
        let mut reminders = Vec::with_capacity(bindings.len());
        for binding in bindings {
            if let Some(interval) = ctx.repos.reminder_intervals.find(binding.interval_id).await {
                reminders.push((interval, binding.enabled));
            }
        }

        Ok(UseCaseRes {
            document,
            reminders,
        })
    }
}
