use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::debug;

use super::DocumentStore;
use crate::error::AppResult;
use crate::models::{NewDocument, StoredDocument};

/// Process-local store for tests and `DOCUMENT_STORE=memory`.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub async fn documents(&self) -> Vec<StoredDocument> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, doc: NewDocument) -> AppResult<StoredDocument> {
        let stored = StoredDocument::from_new(ObjectId::new().to_hex(), doc, Utc::now());
        self.documents.write().await.push(stored.clone());
        debug!(id = %stored.id, "Document stored in memory");
        Ok(stored)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
