use super::*;
use crate::category::CATEGORIES;
use crate::state::test_helpers::{MockStore, listed_files, solid_png, test_app_state};
use crate::store::StoreError;
use std::collections::HashMap;
use std::sync::Arc;

fn png_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, "image/png".parse().unwrap());
    headers
}

fn png_body() -> Bytes {
    Bytes::from(solid_png(image::Rgba([200, 10, 10, 255])))
}

async fn upload(state: &AppState, category: &str) -> Result<(StatusCode, Json<ImageRecord>), ApiError> {
    upload_slot(
        State(state.clone()),
        Path(category.to_string()),
        Query(UploadParams { name: Some("pic.png".into()) }),
        png_headers(),
        png_body(),
    )
    .await
}

async fn choose(state: &AppState, variant: Variant) {
    let Json(snap) = select_variant(State(state.clone()), Json(VariantBody { variant })).await;
    assert_eq!(snap.variant, Some(variant));
}

// =========================================================================
// status mapping
// =========================================================================

#[test]
fn collage_error_to_status_maps_guards_to_conflict() {
    assert_eq!(collage_error_to_status(&CollageError::Incomplete), StatusCode::CONFLICT);
    assert_eq!(collage_error_to_status(&CollageError::NoVariant), StatusCode::CONFLICT);
    assert_eq!(collage_error_to_status(&CollageError::SlotOccupied("Animal")), StatusCode::CONFLICT);
    let err = CollageError::Render(RenderError::Incomplete);
    assert_eq!(collage_error_to_status(&err), StatusCode::CONFLICT);
}

#[test]
fn collage_error_to_status_maps_unknown_category() {
    let err = CollageError::Slot(SlotError::UnknownCategory("Weather".into()));
    assert_eq!(collage_error_to_status(&err), StatusCode::NOT_FOUND);
}

#[test]
fn collage_error_to_status_maps_store_failures() {
    let err = CollageError::UploadFailed(StoreError::Rejected("not an image".into()));
    assert_eq!(collage_error_to_status(&err), StatusCode::BAD_REQUEST);
    let err = CollageError::DeleteFailed(StoreError::Request("reset".into()));
    assert_eq!(collage_error_to_status(&err), StatusCode::BAD_GATEWAY);
    let err = CollageError::Render(RenderError::EmptyOutput);
    assert_eq!(collage_error_to_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

// =========================================================================
// handlers
// =========================================================================

#[tokio::test]
async fn snapshot_lists_all_slots_in_order() {
    let state = test_app_state(Arc::new(MockStore::default()));
    let Json(snap) = snapshot(State(state)).await;
    assert_eq!(snap.view, ViewMode::VariantSelect);
    assert!(snap.variant.is_none());
    assert!(!snap.complete);
    let names: Vec<_> = snap.slots.iter().map(|s| s.category.as_str()).collect();
    let expected: Vec<_> = CATEGORIES.iter().map(|c| c.name).collect();
    assert_eq!(names, expected);
    assert_eq!(snap.slots[1].description, "A special place");
    assert!(snap.slots.iter().all(|s| s.image.is_none()));
}

#[tokio::test]
async fn upload_without_content_type_is_rejected() {
    let store = Arc::new(MockStore::default());
    let state = test_app_state(store.clone());
    choose(&state, Variant::Him).await;

    let (status, Json(body)) = upload_slot(
        State(state.clone()),
        Path("Animal".into()),
        Query(UploadParams { name: None }),
        HeaderMap::new(),
        png_body(),
    )
    .await
    .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.code, "E_UPLOAD_REJECTED");
    assert!(store.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_unknown_category_is_not_found() {
    let state = test_app_state(Arc::new(MockStore::default()));
    choose(&state, Variant::Him).await;
    let (status, Json(body)) = upload(&state, "Weather").await.unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.code, "E_UNKNOWN_CATEGORY");
}

#[tokio::test]
async fn upload_then_delete_slot() {
    let store = Arc::new(MockStore::default());
    let state = test_app_state(store.clone());
    choose(&state, Variant::Her).await;

    let (status, Json(record)) = upload(&state, "hobby").await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record.category, "Hobby");

    let resp = delete_slot(State(state.clone()), Path("Hobby".into())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.delete_calls(), vec![record.key]);

    let resp = delete_slot(State(state.clone()), Path("Hobby".into())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.delete_calls().len(), 1);
}

#[tokio::test]
async fn view_switch_requires_complete_map() {
    let state = test_app_state(Arc::new(MockStore::default()));
    choose(&state, Variant::Him).await;

    let (status, Json(body)) = set_view(State(state.clone()), Json(ViewBody { view: ViewTarget::Collage }))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.code, "E_COLLAGE_INCOMPLETE");

    for cat in &CATEGORIES {
        let (status, _) = upload(&state, cat.name).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
    let Json(snap) = set_view(State(state.clone()), Json(ViewBody { view: ViewTarget::Grid }))
        .await
        .unwrap();
    assert_eq!(snap.view, ViewMode::Grid);
    let Json(snap) = set_view(State(state), Json(ViewBody { view: ViewTarget::Collage }))
        .await
        .unwrap();
    assert_eq!(snap.view, ViewMode::Collage);
}

#[tokio::test]
async fn gallery_fills_slots_and_reset_keeps_files() {
    let store = Arc::new(MockStore::with_files(listed_files(4)));
    let state = test_app_state(store.clone());

    let Json(resp) = load_gallery(State(state.clone())).await.unwrap();
    assert_eq!(resp.filled, 4);
    assert_eq!(resp.session.slots[3].image.as_ref().map(|r| r.key.as_str()), Some("k3"));

    let Json(snap) = change_selection(State(state)).await;
    assert!(snap.slots.iter().all(|s| s.image.is_none()));
    assert_eq!(store.files.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn export_incomplete_is_conflict() {
    let state = test_app_state(Arc::new(MockStore::default()));
    choose(&state, Variant::Her).await;
    let (status, Json(body)) = export(State(state)).await.unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.code, "E_COLLAGE_INCOMPLETE");
}

#[tokio::test]
async fn export_reports_cleanup_failures_in_header() {
    let store = Arc::new(MockStore::default());
    let state = test_app_state(store.clone());
    choose(&state, Variant::Him).await;
    let mut keys = HashMap::new();
    for cat in &CATEGORIES {
        let (_, Json(record)) = upload(&state, cat.name).await.unwrap();
        keys.insert(cat.name, record.key);
    }
    store.fail_delete(&keys["Animal"]);
    store.fail_delete(&keys["Food"]);

    let resp = export(State(state.clone())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(resp.headers()[CLEANUP_FAILED_HEADER], "2");
    assert!(resp.headers().get(MISSING_CATEGORIES_HEADER).is_none());

    let Json(snap) = snapshot(State(state)).await;
    assert_eq!(snap.view, ViewMode::VariantSelect);
    assert!(snap.slots.iter().all(|s| s.image.is_none()));
}

#[tokio::test]
async fn upload_into_filled_slot_is_conflict() {
    let store = Arc::new(MockStore::default());
    let state = test_app_state(store.clone());
    choose(&state, Variant::Her).await;
    let (_, Json(first)) = upload(&state, "Color").await.unwrap();
    assert_eq!(first.category, "Color");

    let (status, Json(body)) = upload(&state, "Color").await.unwrap_err();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.code, "E_SLOT_OCCUPIED");
    assert_eq!(store.uploads.lock().unwrap().len(), 1);
}
