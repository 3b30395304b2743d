use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docchat_extract::ExtractError;
use docchat_llm::LlmError;
use docchat_persist::PersistError;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("{0}")]
    Extraction(#[from] ExtractError),

    /// `message` already names the provider, see `DocumentAnalyst::describe_failure`.
    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: LlmError,
    },

    #[error("{0}")]
    Persist(#[from] PersistError),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    RequestTimeout(Duration),

    #[error("{0}")]
    Internal(String),
}

/// Error payload returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream { source, .. } if source.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Persist(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Persist(e) => tracing::error!("Persistence error: {}", e),
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            ApiError::Upstream { source, .. } => tracing::warn!("Chat API error: {}", source),
            ApiError::Extraction(e) => tracing::warn!("Extraction error: {}", e),
            ApiError::BadRequest(_) | ApiError::Multipart(_) | ApiError::RequestTimeout(_) => {}
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(source: LlmError) -> ApiError {
        ApiError::Upstream {
            message: format!("Error calling DeepSeek API: {}", source),
            source,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("Prompt is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Extraction(ExtractError::Csv("bad".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            upstream(LlmError::EmptyResponse).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::RequestTimeout(Duration::from_secs(300)).status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::BadRequest("Prompt is required".into()).to_string(),
            "Prompt is required"
        );
        assert_eq!(
            ApiError::Extraction(ExtractError::Pdf("bad xref".into())).to_string(),
            "Error extracting PDF text: bad xref"
        );
        assert_eq!(
            upstream(LlmError::EmptyResponse).to_string(),
            "Error calling DeepSeek API: Chat API returned no message content"
        );
        assert_eq!(
            ApiError::RequestTimeout(Duration::from_secs(300)).to_string(),
            "Request timed out after 300s"
        );
    }
}
