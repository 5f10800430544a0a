use crate::error::DocwatchError;
use crate::shared::auth::create_token;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use docwatch_api_structs::register_user::*;
use docwatch_domain::User;
use docwatch_infra::DocwatchContext;

pub async fn register_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<DocwatchContext>,
) -> Result<HttpResponse, DocwatchError> {
    let body = body.0;
    let usecase = RegisterUserUseCase {
        email: body.email,
        password: body.password,
        name: body.name,
        phone_number: body.phone_number,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.user, res.token)))
        .map_err(DocwatchError::from)
}

#[derive(Debug)]
pub struct RegisterUserUseCase {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub user: User,
    pub token: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    MissingFields,
    UserAlreadyExists(String),
    StorageError,
}

impl From<UseCaseError> for DocwatchError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingFields => {
                Self::BadClientData("Email, password and name are required".into())
            }
            UseCaseError::UserAlreadyExists(email) => Self::Conflict(format!(
                "A user with the email: {}, already exists.",
                email
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterUserUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterUser";

    async fn execute(&mut self, ctx: &DocwatchContext) -> Result<Self::Response, Self::Error> {
        if self.email.trim().is_empty() || self.password.is_empty() || self.name.trim().is_empty()
        {
            return Err(UseCaseError::MissingFields);
        }

        if ctx.repos.users.find_by_email(&self.email).await.is_some() {
            return Err(UseCaseError::UserAlreadyExists(self.email.clone()));
        }

        let password_hash = bcrypt::hash(&self.password, bcrypt::DEFAULT_COST)
            .map_err(|_| UseCaseError::StorageError)?;

        let now = ctx.sys.get_timestamp_millis();
        let user = User {
            id: Default::default(),
            email: self.email.clone(),
            password_hash,
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            created: now,
            updated: now,
        };

        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let token = create_token(&user.id, &ctx.config.jwt_secret, now)
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwatch_infra::setup_test_context;

    fn usecase_factory() -> RegisterUserUseCase {
        RegisterUserUseCase {
            email: "a@b.com".into(),
            password: "hunter2hunter2".into(),
            name: "Test User".into(),
            phone_number: None,
        }
    }

    #[actix_web::test]
    async fn registers_user_with_hashed_password() {
        let ctx = setup_test_context();

        let res = execute(usecase_factory(), &ctx).await.unwrap();
        assert!(!res.token.is_empty());
        assert_ne!(res.user.password_hash, "hunter2hunter2");

        let stored = ctx.repos.users.find_by_email("a@b.com").await.unwrap();
        assert!(bcrypt::verify("hunter2hunter2", &stored.password_hash).unwrap());
    }

    #[actix_web::test]
    async fn rejects_duplicate_email() {
        let ctx = setup_test_context();

        execute(usecase_factory(), &ctx).await.unwrap();
        let res = execute(usecase_factory(), &ctx).await;
        assert!(matches!(
            res.unwrap_err(),
            UseCaseError::UserAlreadyExists(_)
        ));
    }

    #[actix_web::test]
    async fn rejects_missing_fields() {
        let ctx = setup_test_context();

        let mut usecase = usecase_factory();
        usecase.email = "".into();
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res.unwrap_err(), UseCaseError::MissingFields));
    }
}
