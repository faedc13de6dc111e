//! Session controller, the single owner of `SessionState`.
//!
//! DESIGN
//! ======
//! Each user action is one async method: await the remote operation, then
//! apply the matching `session::Event`. A failed remote call returns before
//! any transition, so state only changes on success. The one exception is
//! export, where cleanup resets the session even if some deletes fail.
//!
//! Preconditions (variant chosen, map complete) are checked here, before
//! anything is sent to the store or the compositor.

use std::sync::Arc;

use tracing::{info, warn};

use crate::category;
use crate::cleanup::{self, CleanupReport};
use crate::compositor::layout::GridLayout;
use crate::compositor::source::ImageSource;
use crate::compositor::{self, RenderError};
use crate::error::ErrorCode;
use crate::session::{Event, SessionState, Variant, ViewMode, transition};
use crate::slots::{ImageRecord, SlotError};
use crate::store::{FileStore, StoreError, Upload};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CollageError {
    #[error("failed to load images: {0}")]
    FetchListingFailed(#[source] StoreError),
    #[error("upload failed: {0}")]
    UploadFailed(#[source] StoreError),
    #[error("failed to delete image: {0}")]
    DeleteFailed(#[source] StoreError),
    #[error("failed to create collage: {0}")]
    Render(#[from] RenderError),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("collage needs all nine images")]
    Incomplete,
    #[error("choose who the collage is for first")]
    NoVariant,
    #[error("{0} already has an image; delete it first")]
    SlotOccupied(&'static str),
}

impl ErrorCode for CollageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FetchListingFailed(_) => "E_FETCH_LISTING_FAILED",
            Self::UploadFailed(StoreError::Rejected(_)) => "E_UPLOAD_REJECTED",
            Self::UploadFailed(_) => "E_UPLOAD_FAILED",
            Self::DeleteFailed(_) => "E_DELETE_FAILED",
            Self::Render(e) => e.error_code(),
            Self::Slot(e) => e.error_code(),
            Self::Incomplete => "E_COLLAGE_INCOMPLETE",
            Self::NoVariant => "E_NO_VARIANT",
            Self::SlotOccupied(_) => "E_SLOT_OCCUPIED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::FetchListingFailed(e) | Self::UploadFailed(e) | Self::DeleteFailed(e) => e.retryable(),
            _ => false,
        }
    }
}

/// A finished export: the PNG plus what happened during cleanup.
#[derive(Debug)]
pub struct Export {
    pub filename: String,
    pub png: Vec<u8>,
    /// Categories drawn without an image.
    pub missing: Vec<&'static str>,
    pub cleanup: CleanupReport,
}

pub struct SessionController {
    state: SessionState,
    store: Arc<dyn FileStore>,
    images: Arc<dyn ImageSource>,
    layout: GridLayout,
}

// =============================================================================
// CONTROLLER
// =============================================================================

impl SessionController {
    #[must_use]
    pub fn new(store: Arc<dyn FileStore>, images: Arc<dyn ImageSource>) -> Self {
        Self { state: SessionState::default(), store, images, layout: GridLayout::default() }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    fn apply(&mut self, event: Event) {
        self.state = transition(std::mem::take(&mut self.state), event);
    }

    /// Fill empty slots from the store's listing. Returns how many slots
    /// were filled.
    ///
    /// # Errors
    ///
    /// Returns `FetchListingFailed` if the store cannot list; slots are untouched.
    pub async fn load_gallery(&mut self) -> Result<usize, CollageError> {
        let records = self
            .store
            .list()
            .await
            .map_err(CollageError::FetchListingFailed)?;
        let before = self.state.slots.len();
        let listed = records.len();
        self.apply(Event::GalleryLoaded(records));
        let filled = self.state.slots.len() - before;
        info!(listed, filled, "gallery loaded");
        Ok(filled)
    }

    pub fn select_variant(&mut self, variant: Variant) {
        self.apply(Event::SelectVariant(variant));
    }

    /// Back to variant selection, dropping every slot locally. Nothing is
    /// deleted from the store.
    pub fn change_selection(&mut self) {
        self.apply(Event::ChangeSelection);
    }

    /// # Errors
    ///
    /// Returns `NoVariant` before a variant is chosen and `Incomplete` while
    /// any slot is empty.
    pub fn show_collage(&mut self) -> Result<(), CollageError> {
        if self.state.view == ViewMode::VariantSelect {
            return Err(CollageError::NoVariant);
        }
        if !self.state.slots.is_complete() {
            return Err(CollageError::Incomplete);
        }
        self.apply(Event::ShowCollage);
        Ok(())
    }

    pub fn back_to_grid(&mut self) {
        self.apply(Event::BackToGrid);
    }

    /// Upload an image into the empty slot for `category`.
    ///
    /// # Errors
    ///
    /// Returns `Slot` for an unknown category, `NoVariant` before a variant
    /// is chosen, `SlotOccupied` if the slot already holds an image, and
    /// `UploadFailed` if validation or the store rejects it. Nothing is sent
    /// to the store unless the slot is empty, and the slot stays as it was
    /// on any error.
    pub async fn upload(&mut self, category: &str, mut upload: Upload) -> Result<ImageRecord, CollageError> {
        let cat = category::find(category).ok_or_else(|| SlotError::UnknownCategory(category.to_string()))?;
        if self.state.variant.is_none() {
            return Err(CollageError::NoVariant);
        }
        if self.state.slots.get(cat.name).is_some() {
            return Err(CollageError::SlotOccupied(cat.name));
        }
        upload.validate().map_err(CollageError::UploadFailed)?;
        upload.name = format!("{}_{}", cat.name, upload.name);

        let stored = self
            .store
            .upload(upload)
            .await
            .map_err(|e| {
                warn!(error = %e, category = cat.name, "upload failed");
                CollageError::UploadFailed(e)
            })?;
        let record = ImageRecord { url: stored.url, key: stored.key, category: cat.name.to_string() };
        self.apply(Event::ImageAdded { category: cat.name.to_string(), record: record.clone() });
        info!(category = cat.name, key = %record.key, "image uploaded");
        Ok(record)
    }

    /// Delete the image in `category` from the store and free the slot.
    /// An empty slot is a no-op and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `Slot` for an unknown category and `DeleteFailed` if the
    /// store refuses; the slot stays occupied in that case.
    pub async fn delete(&mut self, category: &str) -> Result<Option<ImageRecord>, CollageError> {
        let cat = category::find(category).ok_or_else(|| SlotError::UnknownCategory(category.to_string()))?;
        let Some(record) = self.state.slots.get(cat.name).cloned() else {
            return Ok(None);
        };

        self.store
            .delete(&record.key)
            .await
            .map_err(|e| {
                warn!(error = %e, category = cat.name, key = %record.key, "delete failed");
                CollageError::DeleteFailed(e)
            })?;
        self.apply(Event::ImageRemoved(cat.name.to_string()));
        info!(category = cat.name, key = %record.key, "image deleted");
        Ok(Some(record))
    }

    /// Render the collage, then delete every uploaded image and reset the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `NoVariant` or `Incomplete` without rendering, and `Render`
    /// if the compositor fails; the session is unchanged in all three
    /// cases. Cleanup failures do not fail the export; they are reported in
    /// `Export::cleanup`.
    pub async fn export(&mut self) -> Result<Export, CollageError> {
        let variant = self.state.variant.ok_or(CollageError::NoVariant)?;
        if !self.state.slots.is_complete() {
            return Err(CollageError::Incomplete);
        }

        let collage =
            compositor::render(&self.state.slots, variant.label(), self.images.as_ref(), &self.layout).await?;
        info!(width = collage.width, height = collage.height, filename = %variant.export_filename(), "collage exported");
        let cleanup = cleanup::cleanup_after_export(self.store.as_ref(), &mut self.state).await;
        if let Some(partial) = cleanup.partial_failure() {
            warn!(error = %partial, "collage exported; some uploads were not removed");
        }

        Ok(Export { filename: variant.export_filename(), png: collage.png, missing: collage.missing, cleanup })
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
