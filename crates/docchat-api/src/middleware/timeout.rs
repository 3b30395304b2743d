use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;

use crate::error::ApiError;

/// Bounds the whole request; on expiry the handler future is dropped and the
/// client gets a 408 in the usual error envelope.
pub async fn enforce_timeout(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(limit_ms = %limit.as_millis(), "Request timed out");
            ApiError::RequestTimeout(limit).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn router(limit: Duration) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(middleware::from_fn_with_state(limit, enforce_timeout))
    }

    fn get_req(uri: &str) -> Request {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_slow_request_gets_error_envelope() {
        let response = router(Duration::from_millis(20))
            .oneshot(get_req("/slow"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Request timed out"));
    }

    #[tokio::test]
    async fn test_fast_request_passes_through() {
        let response = router(Duration::from_secs(5))
            .oneshot(get_req("/fast"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
