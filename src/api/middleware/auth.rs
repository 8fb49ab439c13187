use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::{error::ApiError, state::AppState};

/// Rejects calls whose bearer token is not the shared webhook secret.
pub async fn webhook_secret_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !is_authorized(&bearer_token(header), &state.config.webhook_secret) {
        warn!(uri = %request.uri(), "Unauthorized request to KB");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Drops the first `"Bearer "`; a header without it is taken as the raw token.
fn bearer_token(header: &str) -> String {
    header.replacen("Bearer ", "", 1)
}

// Plain equality: the secret is a static shared value, not a credential store.
fn is_authorized(token: &str, secret: &str) -> bool {
    !token.is_empty() && token == secret
}
