use super::token::decode_token;
use crate::error::DocwatchError;
use actix_web::HttpRequest;
use docwatch_domain::{User, ID};
use docwatch_infra::DocwatchContext;

fn parse_authtoken_header(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("authorization")?.to_str().ok()?;
    let token = header
        .trim()
        .strip_prefix("Bearer ")
        .or_else(|| header.trim().strip_prefix("bearer "))?;
    Some(token.to_string())
}

/// Resolves the `User` behind the request's bearer token or rejects with
/// 401.
pub async fn protect_route(
    req: &HttpRequest,
    ctx: &DocwatchContext,
) -> Result<User, DocwatchError> {
    let token = parse_authtoken_header(req).ok_or_else(|| {
        DocwatchError::Unauthorized("Missing or malformed authorization header".into())
    })?;
    let claims = decode_token(&token, &ctx.config.jwt_secret)
        .map_err(|_| DocwatchError::Unauthorized("Invalid auth token".into()))?;
    let user_id = claims
        .user_id
        .parse::<ID>()
        .map_err(|_| DocwatchError::Unauthorized("Invalid auth token".into()))?;

    ctx.repos
        .users
        .find(&user_id)
        .await
        .ok_or_else(|| DocwatchError::Unauthorized("Auth token does not belong to a user".into()))
}
