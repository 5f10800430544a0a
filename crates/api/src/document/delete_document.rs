use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::delete_document::*;
use docwatch_domain::{Document, User, ID};
use docwatch_infra::DocwatchContext;

pub async fn delete_document_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteDocumentUseCase {
        user,
        document_id: path_params.document_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::NoContent().finish())
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct DeleteDocumentUseCase {
    pub user: User,
    pub document_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(document_id) => Self::NotFound(format!(
                "The document with id: {}, was not found.",
                document_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteDocumentUseCase {
    type Response = Document;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteDocument";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let document = match ctx.repos.documents.find(&self.document_id).await {
            Some(document) if document.user_id == self.user.id => document,
            _ => return Err(UseCaseError::NotFound(self.document_id.clone())),
        };

        // Queued fire tasks go first so nothing fires for a dead document
        ctx.queue
            .cancel_document(&document.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .document_reminders
            .delete_by_document(&document.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .documents
            .delete(&document.id)
            .await
            .ok_or(UseCaseError::StorageError)?;

        Ok(document)
    }
}
