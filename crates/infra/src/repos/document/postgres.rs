use super::IDocumentRepo;
use chrono::NaiveDate;
use docwatch_domain::{Document, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDocumentRepo {
    pool: PgPool,
}

impl PostgresDocumentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRaw {
    document_uid: Uuid,
    user_uid: Uuid,
    name: String,
    description: Option<String>,
    identifier: Option<String>,
    expiration_date: NaiveDate,
    timezone: String,
    attachment_url: Option<String>,
    created: i64,
    updated: i64,
}

impl From<DocumentRaw> for Document {
    fn from(raw: DocumentRaw) -> Self {
        Self {
            id: raw.document_uid.into(),
            user_id: raw.user_uid.into(),
            name: raw.name,
            description: raw.description,
            identifier: raw.identifier,
            expiration_date: raw.expiration_date,
            // Rows are written with a validated zone name
            timezone: raw.timezone.parse().unwrap_or(chrono_tz::UTC),
            attachment_url: raw.attachment_url,
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IDocumentRepo for PostgresDocumentRepo {
    async fn insert(&self, document: &Document) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents
            (document_uid, user_uid, name, description, identifier, expiration_date, timezone, attachment_url, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*document.id.inner_ref())
        .bind(*document.user_id.inner_ref())
        .bind(&document.name)
        .bind(&document.description)
        .bind(&document.identifier)
        .bind(document.expiration_date)
        .bind(document.timezone.name())
        .bind(&document.attachment_url)
        .bind(document.created)
        .bind(document.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, document: &Document) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE documents
            SET name = $2, description = $3, identifier = $4, expiration_date = $5, timezone = $6, attachment_url = $7, updated = $8
            WHERE document_uid = $1
            "#,
        )
        .bind(*document.id.inner_ref())
        .bind(&document.name)
        .bind(&document.description)
        .bind(&document.identifier)
        .bind(document.expiration_date)
        .bind(document.timezone.name())
        .bind(&document.attachment_url)
        .bind(document.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, document_id: &ID) -> Option<Document> {
        sqlx::query_as::<_, DocumentRaw>(
            r#"
            SELECT * FROM documents
            WHERE document_uid = $1
            "#,
        )
        .bind(*document_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|document| document.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Document> {
        sqlx::query_as::<_, DocumentRaw>(
            r#"
            SELECT * FROM documents
            WHERE user_uid = $1
            ORDER BY created DESC
            "#,
        )
        .bind(*user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|document| document.into())
        .collect()
    }

    async fn delete(&self, document_id: &ID) -> Option<Document> {
        sqlx::query_as::<_, DocumentRaw>(
            r#"
            DELETE FROM documents
            WHERE document_uid = $1
            RETURNING *
            "#,
        )
        .bind(*document_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|document| document.into())
    }
}
