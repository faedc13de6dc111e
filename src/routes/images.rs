//! Category registry and raw file-host routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::category::{CATEGORIES, Category};
use crate::routes::{ApiError, api_error};
use crate::slots::ImageRecord;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Deserialize)]
pub struct DeleteImageBody {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, thiserror::Error)]
#[error("file key is required")]
pub struct MissingKey;

impl crate::error::ErrorCode for MissingKey {
    fn error_code(&self) -> &'static str {
        "E_MISSING_KEY"
    }
}

/// `GET /api/categories`: the nine slots in collage order.
pub async fn list_categories() -> Json<&'static [Category]> {
    Json(CATEGORIES.as_slice())
}

/// `GET /api/images`: every file currently in the store.
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let store = state.session.lock().await.store().clone();
    let files = store.list().await.map_err(|e| {
        tracing::warn!(error = %e, "listing failed");
        api_error(store_error_to_status(&e), &e)
    })?;
    Ok(Json(files))
}

/// `POST /api/images/delete`: delete one file by key.
pub async fn delete_image(
    State(state): State<AppState>,
    Json(body): Json<DeleteImageBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let key = body.key.trim();
    if key.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, &MissingKey));
    }

    let store = state.session.lock().await.store().clone();
    store.delete(key).await.map_err(|e| {
        tracing::warn!(error = %e, %key, "delete failed");
        api_error(store_error_to_status(&e), &e)
    })?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Rejected(_) => StatusCode::BAD_REQUEST,
        StoreError::Request(_) | StoreError::Response { .. } | StoreError::Parse(_) => StatusCode::BAD_GATEWAY,
        StoreError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
