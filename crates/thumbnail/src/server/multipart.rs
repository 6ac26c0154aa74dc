//! `POST /multipart` - every file part of a form is one image.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use thumbnail_core::{Derivation, Ingress, PipelineError};

use super::AppState;
use crate::error::ApiError;

/// Process each file part in order, stopping at the first failure.
///
/// Non-file fields are ignored.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<Derivation>>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Multipart rejected: {}", e);
        ApiError::MissingForm
    })?;
    let limit = state.thumbnailer.config().limits.max_upload_bytes();

    let mut results = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to parse multipart data: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge { limit }
        } else {
            ApiError::MissingForm
        }
    })? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::TooLarge { limit }
            } else {
                ApiError::File {
                    filename: filename.clone(),
                    source: PipelineError::StreamRead(std::io::Error::other(e.body_text())),
                }
            }
        })?;

        tracing::info!(filename = %filename, bytes = data.len(), "Received multipart image");
        let derivation = state
            .thumbnailer
            .ingest(Ingress::Multipart, data.to_vec())
            .await
            .map_err(|source| ApiError::File {
                filename: filename.clone(),
                source,
            })?;
        results.push(derivation);
    }

    if results.is_empty() {
        return Err(ApiError::NoFiles);
    }
    Ok(Json(results))
}
