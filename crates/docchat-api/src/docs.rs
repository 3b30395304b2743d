use utoipa::OpenApi;

use crate::{error, handlers, routes};

/// OpenAPI document served at `/api/openapi.json` and browsable at `/api/docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::chat::chat,
        routes::conversations::list_conversations,
        routes::conversations::clear_conversations,
        routes::health::health_check,
    ),
    components(schemas(
        handlers::chat::ChatForm,
        handlers::chat::ChatReply,
        routes::conversations::ConversationResponse,
        routes::conversations::ClearResponse,
        routes::health::HealthResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "chat", description = "Document analysis"),
        (name = "conversations", description = "Stored exchanges"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
