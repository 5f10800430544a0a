use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::dtos::DocumentDTO;
use docwatch_api_structs::list_documents::*;
use docwatch_domain::{Document, ReminderInterval, User};
use docwatch_infra::DocwatchContext;

pub async fn list_documents_controller(
    http_req: HttpRequest,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = ListDocumentsUseCase { user };

    execute(usecase, &ctx)
        .await
        .map(|documents| {
            HttpResponse::Ok().json(APIResponse {
                documents: documents
                    .into_iter()
                    .map(|(document, intervals)| DocumentDTO::new(document, intervals))
                    .collect(),
            })
        })
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct ListDocumentsUseCase {
    pub user: User,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for DocwatchError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListDocumentsUseCase {
    type Response = Vec<(Document, Vec<ReminderInterval>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListDocuments";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let documents = ctx.repos.documents.find_by_user(&self.user.id).await;

        let mut res = Vec::with_capacity(documents.len());
        for document in documents {
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
            res.push((document, intervals));
        }

        Ok(res)
    }
}
