//! Collage compositor: renders a complete slot map into one PNG.
//!
//! DESIGN
//! ======
//! Rendering is a single pass over a white RGBA canvas:
//! header title, then each cell's label strip and outlined label, then the
//! images. All nine image fetches are issued together and joined; a cell
//! whose image fails to fetch or decode keeps only its label. Decoding and
//! resizing run on the blocking pool so the runtime threads stay free.
//!
//! ERROR HANDLING
//! ==============
//! Only two things abort a render: the canvas cannot be allocated, or PNG
//! encoding produces no bytes. Per-cell failures are logged and listed in
//! `Collage::missing`.

pub mod layout;
pub mod source;
pub mod text;

use std::io::Cursor;

use futures::future::join_all;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::slots::SlotMap;
use layout::GridLayout;
use source::{FetchError, ImageSource};
use text::TextStyle;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_BAND: Rgba<u8> = Rgba([226, 226, 226, 255]);

const HEADER_STYLE: TextStyle =
    TextStyle { scale: 4, fill: Rgba([17, 17, 17, 255]), stroke: Rgba([17, 17, 17, 255]), stroke_width: 0 };

const LABEL_STYLE: TextStyle =
    TextStyle { scale: 3, fill: Rgba([17, 17, 17, 255]), stroke: Rgba([250, 250, 250, 255]), stroke_width: 2 };

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("collage needs all nine images")]
    Incomplete,
    #[error("drawing surface unavailable: {width}x{height}")]
    Surface { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
    #[error("png encoding produced no data")]
    EmptyOutput,
}

impl ErrorCode for RenderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Incomplete => "E_COLLAGE_INCOMPLETE",
            Self::Surface { .. } | Self::Encode(_) | Self::EmptyOutput => "E_RENDER",
        }
    }
}

/// Why one cell was left without an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("image decode failed: {0}")]
    Decode(String),
}

impl ErrorCode for ImageLoadError {
    fn error_code(&self) -> &'static str {
        "E_IMAGE_DECODE_FAILED"
    }
}

/// A rendered collage.
#[derive(Debug, Clone)]
pub struct Collage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Categories whose image could not be drawn.
    pub missing: Vec<&'static str>,
}

/// Header line for a variant label, e.g. `HOW YOU SEE HER`.
#[must_use]
pub fn header_title(variant_label: &str) -> String {
    format!("HOW YOU SEE {}", variant_label.to_ascii_uppercase())
}

// =============================================================================
// RENDER
// =============================================================================

/// Render `slots` as a 3×3 labeled collage PNG.
///
/// # Errors
///
/// Returns `Incomplete` if any slot is empty, `Surface` if the canvas
/// cannot be allocated, and `Encode`/`EmptyOutput` if PNG encoding fails.
pub async fn render(
    slots: &SlotMap,
    variant_label: &str,
    source: &dyn ImageSource,
    layout: &GridLayout,
) -> Result<Collage, RenderError> {
    if !slots.is_complete() {
        return Err(RenderError::Incomplete);
    }
    let mut canvas = acquire_surface(layout)?;

    let (hx, hy) = layout.header_center();
    text::draw_text_centered(&mut canvas, &header_title(variant_label), hx, hy, &HEADER_STYLE);

    for (category, _) in slots.entries() {
        text::fill_rect(&mut canvas, layout.label_rect(category.id), LABEL_BAND);
        let (lx, ly) = layout.label_center(category.id);
        text::draw_text_centered(&mut canvas, &category.name.to_ascii_uppercase(), lx, ly, &LABEL_STYLE);
    }

    let size = layout.image_size;
    let loads = slots
        .records()
        .map(|(category, record)| async move { (category, load_image(source, &record.url, size).await) });
    let loaded = join_all(loads).await;

    let mut missing = Vec::new();
    for (category, result) in loaded {
        match result {
            Ok(image) => {
                let rect = layout.image_rect(category.id);
                imageops::overlay(&mut canvas, &image, i64::from(rect.x), i64::from(rect.y));
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), category = category.name, "collage cell left without image");
                missing.push(category.name);
            }
        }
    }

    let (width, height) = canvas.dimensions();
    let png = encode_png(canvas)?;
    info!(width, height, bytes = png.len(), missing = missing.len(), "collage rendered");
    Ok(Collage { png, width, height, missing })
}

fn acquire_surface(layout: &GridLayout) -> Result<RgbaImage, RenderError> {
    let (width, height) = (layout.width(), layout.height());
    let fits = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|px| px.checked_mul(4))
        .is_some_and(|bytes| usize::try_from(bytes).is_ok_and(|b| b <= isize::MAX as usize));
    if width == 0 || height == 0 || !fits {
        return Err(RenderError::Surface { width, height });
    }
    Ok(RgbaImage::from_pixel(width, height, BACKGROUND))
}

/// Fetch, decode, and stretch one image to a `size`×`size` square.
async fn load_image(source: &dyn ImageSource, url: &str, size: u32) -> Result<RgbaImage, ImageLoadError> {
    let bytes = source.fetch(url).await?;
    tokio::task::spawn_blocking(move || -> Result<RgbaImage, ImageLoadError> {
        let decoded = image::load_from_memory(&bytes).map_err(|e| ImageLoadError::Decode(e.to_string()))?;
        Ok(imageops::resize(&decoded.to_rgba8(), size, size, FilterType::Triangle))
    })
    .await
    .map_err(|e| ImageLoadError::Decode(e.to_string()))?
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    if png.is_empty() {
        return Err(RenderError::EmptyOutput);
    }
    Ok(png)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
