//! Errors raised while turning a request into a pipeline payload, and their
//! HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use thumbnail_core::PipelineError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The multipart body is absent or cannot be parsed
    #[error("missing form body")]
    MissingForm,

    /// The form parsed but carried no file parts
    #[error("no image files in form")]
    NoFiles,

    /// The base64 endpoint received an empty body
    #[error("missing request body")]
    MissingBody,

    /// The base64 body is not a JSON string
    #[error("request body must be a JSON string: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON string is not standard base64
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The reference endpoint was called without a URL
    #[error("missing url parameter")]
    MissingUrl,

    /// The remote image could not be fetched
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The payload exceeds the configured upload cap
    #[error("payload exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// A multipart file part failed in the pipeline
    #[error("{filename}: {source}")]
    File {
        filename: String,
        #[source]
        source: PipelineError,
    },

    /// The pipeline rejected the payload
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingForm
            | ApiError::NoFiles
            | ApiError::MissingBody
            | ApiError::InvalidJson(_)
            | ApiError::InvalidBase64(_)
            | ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            ApiError::File { source, .. } | ApiError::Pipeline(source) => {
                if source.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Internal service error: {:#}", self);
        } else if status == StatusCode::BAD_GATEWAY {
            tracing::warn!("Upstream error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, self.to_string()).into_response()
    }
}
