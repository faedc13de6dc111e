//! Session state and its transition function.
//!
//! DESIGN
//! ======
//! The whole UI session is one `SessionState` value. Every change goes
//! through `transition(state, event) -> state`, which performs no I/O, so
//! the view-mode rules can be tested without a store or a renderer.
//!
//! View modes: `VariantSelect` (initial) -> `Grid` -> `Collage`. The grid
//! advances to the collage on its own whenever it holds a complete map,
//! whether the last slot just filled or the variant was picked over a map
//! the gallery had already filled. Post-export
//! cleanup and "change selection" both land back in `VariantSelect` with an
//! empty slot map.

use serde::{Deserialize, Serialize};

use crate::slots::{ImageRecord, SlotMap};

// =============================================================================
// TYPES
// =============================================================================

/// Who the collage is about. Drives the header title and export filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Him,
    Her,
}

impl Variant {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Him => "him",
            Self::Her => "her",
        }
    }

    /// Download filename for the exported collage.
    #[must_use]
    pub fn export_filename(self) -> String {
        format!("how-you-see-{}.png", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    VariantSelect,
    Grid,
    Collage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub slots: SlotMap,
    pub variant: Option<Variant>,
    pub view: ViewMode,
}

/// Everything that can happen to a session.
#[derive(Debug, Clone)]
pub enum Event {
    SelectVariant(Variant),
    /// An upload into `category` completed.
    ImageAdded { category: String, record: ImageRecord },
    /// The listing collaborator returned existing files.
    GalleryLoaded(Vec<ImageRecord>),
    /// The image in `category` was deleted remotely.
    ImageRemoved(String),
    ShowCollage,
    BackToGrid,
    /// Local-only reset; nothing is deleted remotely.
    ChangeSelection,
    /// Post-export cleanup finished (fully or partially).
    ExportCleanedUp,
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Apply `event` to `state`.
///
/// Events that do not apply in the current view (e.g. `BackToGrid` outside
/// the collage) leave the state unchanged. `ImageAdded` with an unknown
/// category is dropped; the controller validates categories before it
/// uploads anything.
#[must_use]
pub fn transition(mut state: SessionState, event: Event) -> SessionState {
    match event {
        Event::SelectVariant(variant) => {
            state.variant = Some(variant);
            if state.view == ViewMode::VariantSelect {
                state.view = ViewMode::Grid;
                auto_advance(&mut state);
            }
        }
        Event::ImageAdded { category, record } => {
            if state.slots.insert(&category, record).is_ok() {
                auto_advance(&mut state);
            }
        }
        Event::GalleryLoaded(records) => {
            state.slots.assign_first_available(records);
            auto_advance(&mut state);
        }
        Event::ImageRemoved(category) => {
            state.slots.remove(&category);
            if state.view == ViewMode::Collage {
                state.view = ViewMode::Grid;
            }
        }
        Event::ShowCollage => {
            if state.view == ViewMode::Grid && state.slots.is_complete() {
                state.view = ViewMode::Collage;
            }
        }
        Event::BackToGrid => {
            if state.view == ViewMode::Collage {
                state.view = ViewMode::Grid;
            }
        }
        Event::ChangeSelection | Event::ExportCleanedUp => {
            state.slots.clear();
            state.variant = None;
            state.view = ViewMode::VariantSelect;
        }
    }
    state
}

fn auto_advance(state: &mut SessionState) {
    if state.view == ViewMode::Grid && state.slots.is_complete() {
        state.view = ViewMode::Collage;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
