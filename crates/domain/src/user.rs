use crate::shared::entity::{Entity, ID};

#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub email: String,
    /// Bcrypt hash, never the plaintext password
    pub password_hash: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
