use crate::error::DocwatchError;
use crate::shared::auth::create_token;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docwatch_api_structs::login_user::*;
use docwatch_domain::User;
use docwatch_infra::DocwatchContext;

pub async fn login_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let body = body.0;
    let usecase = LoginUserUseCase {
        email: body.email,
        password: body.password,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.user, res.token)))
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct LoginUserUseCase {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub user: User,
    pub token: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidCredentials,
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidCredentials => {
                Self::Unauthorized("Invalid email or password".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for LoginUserUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "LoginUser";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .find_by_email(&self.email)
            .await
            .ok_or(UseCaseError::InvalidCredentials)?;

        let valid = bcrypt::verify(&self.password, &user.password_hash)
            .map_err(|_| UseCaseError::InvalidCredentials)?;
        if !valid {
            return Err(UseCaseError::InvalidCredentials);
        }

        let token = create_token(
            &user.id,
            &ctx.config.jwt_secret,
            ctx.sys.get_timestamp_millis(),
        )
        .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { user, token })
    }
}
