use async_trait::async_trait;
use std::path::Path;
use std::sync::RwLock;

use crate::domain::{ports::DocumentStore, Document, DomainError, KeywordFilter};

#[derive(Debug)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Loads a JSON array of documents, as the REST endpoint would return them.
    pub async fn from_seed_file(path: &Path) -> Result<Self, DomainError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::internal(format!("{}: {e}", path.display())))?;
        let documents: Vec<Document> = serde_json::from_str(&raw)
            .map_err(|e| DomainError::internal(format!("{}: {e}", path.display())))?;
        Ok(Self::with_documents(documents))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError> {
        let store = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(store.clone())
    }

    async fn fetch_matching(&self, filter: &KeywordFilter) -> Result<Vec<Document>, DomainError> {
        let store = self
            .documents
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(store.iter().filter(|d| filter.matches(d)).cloned().collect())
    }
}
