use async_trait::async_trait;

use crate::domain::{errors::DomainError, Document, KeywordFilter};

/// Read-only access to the document table.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError>;
    async fn fetch_matching(&self, filter: &KeywordFilter) -> Result<Vec<Document>, DomainError>;
}
