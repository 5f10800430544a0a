use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::get_document::*;
use docwatch_domain::{Document, ReminderInterval, User, ID};
use docwatch_infra::DocwatchContext;

pub async fn get_document_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetDocumentUseCase {
        user,
        document_id: path_params.document_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.0, res.1)))
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct GetDocumentUseCase {
    pub user: User,
    pub document_id: ID,
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
impl UseCase for GetDocumentUseCase {
    type Response = (Document, Vec<ReminderInterval>);

    type Error = UseCaseError;

    const NAME: &'static str = "GetDocument";

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
        let mut intervals = Vec::new();
        for binding in bindings.iter().filter(|b| b.enabled) {
            if let Some(interval) = ctx.repos.reminder_intervals.find(binding.interval_id).await {
                intervals.push(interval);
            }
        }

        Ok((document, intervals))
    }
}
