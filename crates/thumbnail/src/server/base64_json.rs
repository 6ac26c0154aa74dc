//! `POST /base64` - a JSON string holding a base64-encoded image.

use axum::{body::Bytes, extract::State, Json};
use thumbnail_core::{Derivation, Ingress};

use super::AppState;
use crate::error::ApiError;
use crate::ingress::decode_base64_body;

pub async fn upload(State(state): State<AppState>, body: Bytes) -> Result<Json<Derivation>, ApiError> {
    let data = decode_base64_body(&body)?;
    tracing::info!(bytes = data.len(), "Received base64 image");
    let derivation = state.thumbnailer.ingest(Ingress::Base64, data).await?;
    Ok(Json(derivation))
}
