pub mod health;
pub mod search;

use std::any::Any;

use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, routing::post, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::api::middleware::{request_logger, webhook_secret_auth};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(health::liveness))
        .route("/health", get(health::health_check))
        .nest("/kb", kb_routes(state.clone()))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(AnyOrigin)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn kb_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/search", post(search::search_handler))
        .route_layer(middleware::from_fn_with_state(state, webhook_secret_auth))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("Internal server error")
        .to_string();

    tracing::error!(error = %message, "Handler panicked");
    ApiError::Unexpected(message).into_response()
}
