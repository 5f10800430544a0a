use docwatch_domain::ID;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_SECS: usize = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Expiration time as UTC seconds
    pub exp: usize,
    /// Issued at as UTC seconds
    pub iat: usize,
    /// The `User` this token belongs to
    pub user_id: String,
}

pub fn create_token(user_id: &ID, secret: &str, now_millis: i64) -> anyhow::Result<String> {
    let iat = (now_millis / 1000) as usize;
    let claims = Claims {
        exp: iat + TOKEN_TTL_SECS,
        iat,
        user_id: user_id.as_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_token(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(decoded.claims)
}
