use docwatch_domain::{User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
        }
    }
}
