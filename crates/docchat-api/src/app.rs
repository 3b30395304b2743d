use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    docs::ApiDoc,
    error::ApiError,
    handlers::chat,
    middleware::{logging, timeout},
    routes::{conversations, health},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/chat", post(chat::chat))
        .route(
            "/conversations",
            get(conversations::list_conversations).delete(conversations::clear_conversations),
        );

    // Front-end: `/` is index.html, everything else unmatched is looked up on disk
    let static_dir = state.config.server.static_dir.clone();
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .route_service("/", index)
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging::log_request))
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(state.config.server.request_timeout_secs),
            timeout::enforce_timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(AnyOrigin);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(AnyOrigin)
    } else {
        let parsed_origins: Vec<axum::http::HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
            .collect();

        cors.allow_origin(parsed_origins)
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    ApiError::Internal(detail).into_response()
}
