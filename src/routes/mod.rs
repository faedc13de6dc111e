//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON/PNG endpoints under a single Axum router. The
//! `/api/images` routes talk to the file host directly; `/api/session`
//! routes drive the one in-memory session through its controller.

pub mod images;
pub mod session;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorBody, ErrorCode};
use crate::state::AppState;
use crate::store::MAX_UPLOAD_BYTES;

/// Request body cap for raw uploads. Slightly above the store limit so an
/// oversize image reaches validation and gets a coded error instead of a
/// bare 413.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorBody>);

pub(crate) fn api_error(status: StatusCode, err: &impl ErrorCode) -> ApiError {
    (status, Json(ErrorBody::from_error(err)))
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/categories", get(images::list_categories))
        .route("/api/images", get(images::list_images))
        .route("/api/images/delete", post(images::delete_image))
        .route("/api/session", get(session::snapshot))
        .route("/api/session/variant", post(session::select_variant))
        .route("/api/session/reset", post(session::change_selection))
        .route("/api/session/gallery", post(session::load_gallery))
        .route("/api/session/view", post(session::set_view))
        .route(
            "/api/session/slots/{category}",
            put(session::upload_slot)
                .delete(session::delete_slot)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/session/export", post(session::export))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
