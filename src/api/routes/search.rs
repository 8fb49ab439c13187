use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::{SearchHit, WebhookPayload};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<SearchHit>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let payload = read_payload(&headers, &body).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected KB search payload");
    })?;

    let query = payload.user_query();
    let documents = state.search_service.search(&query).await.map_err(|e| {
        tracing::error!(error = %e, "KB search error");
        e
    })?;

    Ok(Json(SearchResponse { documents }))
}

/// Bodies not declared as JSON, and empty JSON bodies, read as an empty payload.
fn read_payload(headers: &HeaderMap, body: &[u8]) -> Result<WebhookPayload, ApiError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(WebhookPayload::default());
    }
    Ok(serde_json::from_slice(body)?)
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || essence
            .strip_prefix("application/")
            .is_some_and(|subtype| subtype.ends_with("+json"))
}
