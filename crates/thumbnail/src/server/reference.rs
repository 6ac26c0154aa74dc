//! `GET /reference?url=...` - fetch a remote image and store it.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use thumbnail_core::{Derivation, Ingress};

use super::AppState;
use crate::error::ApiError;
use crate::ingress::fetch_reference;

#[derive(Debug, Deserialize)]
pub struct ReferenceQuery {
    #[serde(default)]
    pub url: String,
}

pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<ReferenceQuery>,
) -> Result<Json<Derivation>, ApiError> {
    let limit = state.thumbnailer.config().limits.max_upload_bytes();
    let data = fetch_reference(&state.client, &query.url, limit).await?;
    tracing::info!(url = %query.url, bytes = data.len(), "Fetched reference image");
    let derivation = state.thumbnailer.ingest(Ingress::Reference, data).await?;
    Ok(Json(derivation))
}
