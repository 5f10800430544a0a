use crate::dtos::UserDTO;
use docwatch_domain::User;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: UserDTO,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self {
            user: UserDTO::new(user),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserDTO,
    pub token: String,
}

impl SessionResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            user: UserDTO::new(user),
            token,
        }
    }
}

pub mod register_user {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        pub password: String,
        pub name: String,
        pub phone_number: Option<String>,
    }

    pub type APIResponse = SessionResponse;
}

pub mod login_user {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub email: String,
        pub password: String,
    }

    pub type APIResponse = SessionResponse;
}

pub mod get_me {
    use super::*;

    pub type APIResponse = UserResponse;
}
