use super::IUserRepo;
use docwatch_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    email: String,
    password_hash: String,
    name: String,
    phone_number: Option<String>,
    created: i64,
    updated: i64,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            email: raw.email,
            password_hash: raw.password_hash,
            name: raw.name,
            phone_number: raw.phone_number,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (user_uid, email, password_hash, name, phone_number, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*user.id.inner_ref())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.created)
        .bind(user.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE user_uid = $1
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|user| user.into())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|user| user.into())
    }
}
