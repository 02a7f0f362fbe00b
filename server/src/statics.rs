use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::json;

use crate::AppState;

/// What the fallback route should do with an unrouted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticDecision {
    /// Unmatched path under the API prefix.
    ApiMiss,
    /// A script asset that does not exist; answering with the shell here
    /// would mask the missing file behind an HTML body.
    AssetMiss,
    /// Everything else gets the application shell.
    Shell,
}

pub fn classify(path: &str) -> StaticDecision {
    let path = path.trim_start_matches('/');
    if path.starts_with("api/") {
        StaticDecision::ApiMiss
    } else if path.ends_with(".js") {
        StaticDecision::AssetMiss
    } else {
        StaticDecision::Shell
    }
}

/// Fallback handler: SPA shell for app paths, 404 for API and asset misses.
pub async fn serve_shell(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match classify(uri.path()) {
        StaticDecision::ApiMiss => {
            (StatusCode::NOT_FOUND, "API route not found").into_response()
        }
        StaticDecision::AssetMiss => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "File not found"})),
        )
            .into_response(),
        StaticDecision::Shell => {
            let shell = state.config.static_dir.join("index.html");
            match tokio::fs::read_to_string(&shell).await {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::warn!(path = %shell.display(), "shell unavailable: {e}");
                    (StatusCode::NOT_FOUND, "File not found").into_response()
                }
            }
        }
    }
}
