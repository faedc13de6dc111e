//! Session routes.
//!
//! Every handler takes the session lock for its whole duration, so an
//! upload that is still talking to the file host holds back a concurrent
//! export until it lands.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::compositor::RenderError;
use crate::controller::{CollageError, SessionController};
use crate::routes::images::store_error_to_status;
use crate::routes::{ApiError, api_error};
use crate::session::{Variant, ViewMode};
use crate::slots::{ImageRecord, SlotError};
use crate::state::AppState;
use crate::store::Upload;

/// Number of post-export deletes that failed; absent when cleanup was clean.
pub const CLEANUP_FAILED_HEADER: HeaderName = HeaderName::from_static("x-cleanup-failed");
/// Comma-separated categories drawn without an image.
pub const MISSING_CATEGORIES_HEADER: HeaderName = HeaderName::from_static("x-missing-categories");

const DEFAULT_UPLOAD_NAME: &str = "upload";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SlotView {
    pub category: String,
    pub description: String,
    pub image: Option<ImageRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub view: ViewMode,
    pub variant: Option<Variant>,
    pub complete: bool,
    pub slots: Vec<SlotView>,
}

impl SessionSnapshot {
    fn of(ctl: &SessionController) -> Self {
        let state = ctl.state();
        Self {
            view: state.view,
            variant: state.variant,
            complete: state.slots.is_complete(),
            slots: state
                .slots
                .entries()
                .map(|(category, image)| SlotView {
                    category: category.name.to_owned(),
                    description: category.description.to_owned(),
                    image: image.cloned(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct VariantBody {
    pub variant: Variant,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewTarget {
    Grid,
    Collage,
}

#[derive(Deserialize)]
pub struct ViewBody {
    pub view: ViewTarget,
}

#[derive(Deserialize)]
pub struct UploadParams {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct GalleryResponse {
    pub filled: usize,
    pub session: SessionSnapshot,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/session`: current view, variant and slots in collage order.
pub async fn snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let ctl = state.session.lock().await;
    Json(SessionSnapshot::of(&ctl))
}

/// `POST /api/session/variant`: choose who the collage is for.
pub async fn select_variant(State(state): State<AppState>, Json(body): Json<VariantBody>) -> Json<SessionSnapshot> {
    let mut ctl = state.session.lock().await;
    ctl.select_variant(body.variant);
    Json(SessionSnapshot::of(&ctl))
}

/// `POST /api/session/reset`: back to variant selection. Uploaded files
/// stay in the store.
pub async fn change_selection(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut ctl = state.session.lock().await;
    ctl.change_selection();
    Json(SessionSnapshot::of(&ctl))
}

/// `POST /api/session/gallery`: fill empty slots from the store listing.
pub async fn load_gallery(State(state): State<AppState>) -> Result<Json<GalleryResponse>, ApiError> {
    let mut ctl = state.session.lock().await;
    let filled = ctl.load_gallery().await.map_err(collage_error)?;
    Ok(Json(GalleryResponse { filled, session: SessionSnapshot::of(&ctl) }))
}

/// `POST /api/session/view`: switch between grid and collage.
pub async fn set_view(
    State(state): State<AppState>,
    Json(body): Json<ViewBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut ctl = state.session.lock().await;
    match body.view {
        ViewTarget::Collage => ctl.show_collage().map_err(collage_error)?,
        ViewTarget::Grid => ctl.back_to_grid(),
    }
    Ok(Json(SessionSnapshot::of(&ctl)))
}

/// `PUT /api/session/slots/:category`: upload the raw request body into a
/// slot. The file name comes from `?name=`.
pub async fn upload_slot(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ImageRecord>), ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_owned());
    let upload = Upload { name, content_type, bytes: body.to_vec() };

    let mut ctl = state.session.lock().await;
    let record = ctl.upload(&category, upload).await.map_err(collage_error)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /api/session/slots/:category`: delete the slot's image from the
/// store and free the slot. An empty slot answers 204.
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Response, ApiError> {
    let mut ctl = state.session.lock().await;
    match ctl.delete(&category).await.map_err(collage_error)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// `POST /api/session/export`: render the collage as a PNG attachment,
/// then clean up the store and reset the session.
pub async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut ctl = state.session.lock().await;
    let export = ctl.export().await.map_err(collage_error)?;
    drop(ctl);

    let mut response = (
        [
            (CONTENT_TYPE, "image/png".to_owned()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", export.filename)),
        ],
        export.png,
    )
        .into_response();

    let extra = response.headers_mut();
    if !export.cleanup.is_clean() {
        extra.insert(CLEANUP_FAILED_HEADER, export.cleanup.failed.len().into());
    }
    if !export.missing.is_empty() {
        if let Ok(value) = export.missing.join(",").parse() {
            extra.insert(MISSING_CATEGORIES_HEADER, value);
        }
    }
    Ok(response)
}

// =============================================================================
// ERRORS
// =============================================================================

pub(crate) fn collage_error_to_status(err: &CollageError) -> StatusCode {
    match err {
        CollageError::FetchListingFailed(e) | CollageError::UploadFailed(e) | CollageError::DeleteFailed(e) => {
            store_error_to_status(e)
        }
        CollageError::Render(RenderError::Incomplete)
        | CollageError::Incomplete
        | CollageError::NoVariant
        | CollageError::SlotOccupied(_) => {
            StatusCode::CONFLICT
        }
        CollageError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CollageError::Slot(SlotError::UnknownCategory(_)) => StatusCode::NOT_FOUND,
    }
}

fn collage_error(err: CollageError) -> ApiError {
    api_error(collage_error_to_status(&err), &err)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
