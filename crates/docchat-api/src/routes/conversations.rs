use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use docchat_persist::Conversation;
use crate::{error::{ApiResult, ErrorBody}, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub id: u64,
    /// ISO-8601 local time with offset
    pub timestamp: String,
    pub prompt: String,
    /// First 500 characters of the extracted document text
    pub document_text: String,
    pub response: String,
    pub has_document: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// List every stored conversation, oldest first
#[utoipa::path(
    get,
    path = "/api/conversations",
    responses(
        (status = 200, description = "All conversations", body = [ConversationResponse]),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ConversationResponse>>> {
    let conversations = state.store.list().await?;

    Ok(Json(
        conversations
            .into_iter()
            .map(conversation_to_response)
            .collect(),
    ))
}

/// Delete every stored conversation
#[utoipa::path(
    delete,
    path = "/api/conversations",
    responses(
        (status = 200, description = "Log cleared", body = ClearResponse),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "conversations"
)]
pub async fn clear_conversations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ClearResponse>> {
    state.store.clear().await?;

    Ok(Json(ClearResponse {
        success: true,
        message: "All conversations cleared".to_string(),
    }))
}

fn conversation_to_response(conversation: Conversation) -> ConversationResponse {
    ConversationResponse {
        id: conversation.id,
        timestamp: conversation.timestamp.to_rfc3339(),
        prompt: conversation.prompt,
        document_text: conversation.document_text,
        response: conversation.response,
        has_document: conversation.has_document,
    }
}
