use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::warn;

use crate::domain::{ports::DocumentStore, Document, DomainError, KeywordFilter};
use crate::infrastructure::config::SupabaseConfig;

/// Column the keyword filter runs against.
const SEARCH_COLUMN: &str = "content";

/// Document table exposed through a Supabase (PostgREST) REST endpoint.
pub struct SupabaseDocumentStore {
    client: Client,
    endpoint: Url,
}

/// Error body PostgREST sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

impl SupabaseDocumentStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, DomainError> {
        let endpoint = Url::parse(&format!(
            "{}/rest/v1/{}",
            config.url.trim_end_matches('/'),
            config.table
        ))
        .map_err(|e| DomainError::store(format!("invalid store url: {e}")))?;

        let key = HeaderValue::from_str(&config.key)
            .map_err(|e| DomainError::store(format!("invalid store key: {e}")))?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|e| DomainError::store(format!("invalid store key: {e}")))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::store(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    async fn select(&self, or: Option<String>) -> Result<Vec<Document>, DomainError> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(or) = &or {
                query.append_pair("or", or);
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(status = %status, error = %e, "Failed to read store error body");
                String::new()
            });
            let message = serde_json::from_str::<PostgrestError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("{status}: {body}"));
            return Err(DomainError::store(message));
        }

        response
            .json::<Vec<Document>>()
            .await
            .map_err(|e| DomainError::store(e.to_string()))
    }
}

/// Renders the keyword filter as a PostgREST `or` expression.
pub fn or_expression(filter: &KeywordFilter) -> String {
    let conditions: Vec<String> = filter
        .keywords()
        .iter()
        .map(|k| format!("{SEARCH_COLUMN}.ilike.{}", quote_value(&format!("*{k}*"))))
        .collect();
    format!("({})", conditions.join(","))
}

/// Double-quotes values containing characters reserved by the filter grammar.
fn quote_value(value: &str) -> String {
    const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];
    if !value.contains(RESERVED) {
        return value.to_string();
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[async_trait]
impl DocumentStore for SupabaseDocumentStore {
    async fn fetch_all(&self) -> Result<Vec<Document>, DomainError> {
        self.select(None).await
    }

    async fn fetch_matching(&self, filter: &KeywordFilter) -> Result<Vec<Document>, DomainError> {
        self.select(Some(or_expression(filter))).await
    }
}
