use super::IDocumentRepo;
use crate::repos::shared::inmemory_repo::*;
use docwatch_domain::{Document, ID};

pub struct InMemoryDocumentRepo {
    documents: std::sync::Mutex<Vec<Document>>,
}

impl InMemoryDocumentRepo {
    pub fn new() -> Self {
        Self {
            documents: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IDocumentRepo for InMemoryDocumentRepo {
    async fn insert(&self, document: &Document) -> anyhow::Result<()> {
        insert(document, &self.documents);
        Ok(())
    }

    async fn save(&self, document: &Document) -> anyhow::Result<()> {
        save(document, &self.documents);
        Ok(())
    }

    async fn find(&self, document_id: &ID) -> Option<Document> {
        find(document_id, &self.documents)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Document> {
        find_by(&self.documents, |d| d.user_id == *user_id)
    }

    async fn delete(&self, document_id: &ID) -> Option<Document> {
        delete(document_id, &self.documents)
    }
}
