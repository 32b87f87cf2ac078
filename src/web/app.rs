use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{AppState, Result, WebError};
use crate::batch::resolve_document;

/// Served on `GET /`
pub const USAGE: &str = include_str!("../../README.md");

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(usage).post(resolve))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones
pub fn cors_layer(origins: &[String]) -> std::result::Result<CorsLayer, String> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed = origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| format!("Invalid origin '{}'", origin))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        AllowOrigin::list(parsed)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

async fn usage() -> &'static str {
    USAGE
}

async fn resolve(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(document) =
        body.map_err(|rejection| WebError::Input(format!("Body must be JSON: {}", rejection.body_text())))?;

    if !document.is_object() {
        return Err(WebError::Input("Body must be a JSON object".to_string()));
    }

    let pipeline = resolve_document(&document, state.store.as_ref(), &state.locator);
    let resolved = match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, pipeline)
            .await
            .map_err(|_| WebError::Timeout)??,
        None => pipeline.await?,
    };

    Ok(Json(resolved))
}
