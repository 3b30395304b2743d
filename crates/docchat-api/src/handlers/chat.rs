use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use docchat_llm::NO_DOCUMENT_PLACEHOLDER;
use docchat_persist::NewConversation;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    state::AppState,
};

/// Multipart form accepted by `POST /api/chat` (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ChatForm {
    /// User request; surrounding whitespace is ignored
    pub prompt: String,
    /// Optional PDF, image (png/jpg/jpeg/gif/bmp) or CSV file
    #[schema(value_type = Option<String>, format = Binary)]
    pub document: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub conversation_id: u64,
}

struct UploadedDocument {
    filename: String,
    bytes: Bytes,
}

#[derive(Default)]
struct ChatInput {
    prompt: Option<String>,
    document: Option<UploadedDocument>,
}

impl ChatInput {
    async fn read(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut input = ChatInput::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("prompt") => {
                    input.prompt = Some(field.text().await?);
                }
                Some("document") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked.
                    if !filename.is_empty() {
                        input.document = Some(UploadedDocument { filename, bytes });
                    }
                }
                _ => {}
            }
        }

        Ok(input)
    }
}

/// Analyze an optional document against the user's prompt
///
/// Extracts text from the uploaded document, sends it with the prompt to the
/// chat model, and records the exchange.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body(content = ChatForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model response", body = ChatReply),
        (status = 400, description = "Prompt missing or malformed form", body = ErrorBody),
        (status = 422, description = "Document could not be read (when failures are surfaced)", body = ErrorBody),
        (status = 502, description = "Chat API failed (when failures are surfaced)", body = ErrorBody),
        (status = 504, description = "Chat API timed out (when failures are surfaced)", body = ErrorBody),
        (status = 500, description = "Unexpected failure", body = ErrorBody)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ChatReply>> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = ChatInput::read(&mut multipart).await?;

    let prompt = input.prompt.as_deref().unwrap_or_default().trim().to_string();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".to_string()));
    }

    let embed_failures = state.config.chat.embed_failures;

    let mut document_text = match input.document {
        Some(document) => extract_document(&state, document, embed_failures).await?,
        None => String::new(),
    };
    if document_text.is_empty() {
        document_text = NO_DOCUMENT_PLACEHOLDER.to_string();
    }

    let response = if embed_failures {
        state.analyst.analyze_or_describe(&prompt, &document_text).await
    } else {
        state
            .analyst
            .analyze(&prompt, &document_text)
            .await
            .map_err(|source| ApiError::Upstream {
                message: state.analyst.describe_failure(&source),
                source,
            })?
    };

    let has_document = document_text != NO_DOCUMENT_PLACEHOLDER;
    let conversation = state
        .store
        .append(NewConversation::new(
            prompt,
            &document_text,
            response.clone(),
            has_document,
        ))
        .await?;

    tracing::info!(
        conversation_id = conversation.id,
        has_document,
        "Chat exchange recorded"
    );

    Ok(Json(ChatReply {
        success: true,
        response,
        conversation_id: conversation.id,
    }))
}

/// Runs extraction on the blocking pool; PDF parsing and OCR are CPU-bound.
async fn extract_document(
    state: &AppState,
    document: UploadedDocument,
    embed_failures: bool,
) -> ApiResult<String> {
    let extractor = Arc::clone(&state.extractor);

    let result = tokio::task::spawn_blocking(move || {
        let UploadedDocument { filename, bytes } = document;
        if embed_failures {
            Ok(extractor.extract_or_describe(&filename, &bytes))
        } else {
            extractor.extract(&filename, &bytes)
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))?;

    Ok(result?)
}
