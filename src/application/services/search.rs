use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::{ports::DocumentStore, DomainError, KeywordFilter, SearchHit};

/// Keyword search over the document table with a return-everything fallback.
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Runs the search for an already-extracted user query.
    ///
    /// The full table is always fetched first and returned whenever the
    /// keyword filter matches nothing. The two store calls run one after
    /// the other; either failing aborts the search.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        info!(query, "Query received");

        let all_docs = self.store.fetch_all().await?;
        debug!(count = all_docs.len(), documents = ?all_docs, "All documents in table");

        let filter = KeywordFilter::from_query(query);
        let matched = self.store.fetch_matching(&filter).await?;

        let fallback = matched.is_empty();
        let results = if fallback { all_docs } else { matched };
        debug!(count = results.len(), fallback, documents = ?results, "Search results");

        Ok(results.into_iter().map(SearchHit::from).collect())
    }
}
