/// HTTP handlers for the pagesmith browser UI
pub mod generate;
pub mod page;

#[cfg(test)]
mod test_handlers;

use axum::Router;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{HeaderMap, Request, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use std::collections::HashMap;
use std::sync::Arc;

use crate::service::PagesmithService;

/// Allowance for multipart boundaries, headers and the prompt field
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router(service: PagesmithService, bearer_token: Option<String>) -> Router {
    let body_limit = service.max_upload_bytes() + MULTIPART_OVERHEAD;

    let mut router = Router::new()
        .route("/", get(page::index))
        .route("/api/generate", post(generate::generate))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service);

    if let Some(expected) = bearer_token {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(expected),
            require_bearer,
        ));
    }

    router.route("/health", get(|| async { "ok" }))
}

async fn require_bearer(
    State(expected): State<Arc<String>>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    if req.uri().path().eq("/health") {
        return next.run(req).await;
    }
    let headers: &HeaderMap = req.headers();
    let authorized = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", expected.as_str()))
        || query_token_matches(req.uri(), expected.as_str());
    if !authorized {
        tracing::warn!(path = %req.uri().path(), "Rejected request without valid bearer token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}

// Fallback for the browser page, which cannot set headers on navigation.
// Accepted keys: access_token, token. Values are percent-decoded.
fn query_token_matches(uri: &Uri, expected: &str) -> bool {
    let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(uri) else {
        return false;
    };
    ["access_token", "token"]
        .iter()
        .any(|key| params.get(*key).is_some_and(|v| v == expected))
}
