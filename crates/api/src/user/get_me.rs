use crate::error::DocwatchError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use docwatch_api_structs::get_me::*;
use docwatch_infra::DocwatchContext;

pub async fn get_me_controller(
    http_req: HttpRequest,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let user = protect_route(&http_req, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(user)))
}
