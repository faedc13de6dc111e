//! Bitmap text for labels and the header line.
//!
//! Glyphs come from the 8×8 `font8x8` table and are scaled up by an
//! integer factor. Characters outside ASCII render as `?`. The outline is
//! painted first by stamping each lit glyph pixel grown by `stroke_width`,
//! then the fill is drawn on top.

use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};

const GLYPH_SIZE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Pixels per glyph cell edge; 3 gives 24px glyphs.
    pub scale: u32,
    pub fill: Rgba<u8>,
    pub stroke: Rgba<u8>,
    /// Outline thickness in output pixels. 0 disables the outline.
    pub stroke_width: u32,
}

/// Rendered width of `text` in pixels, excluding the outline.
#[must_use]
pub fn text_width(text: &str, scale: u32) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let chars = text.chars().count() as u32;
    chars * GLYPH_SIZE * scale
}

/// Draw `text` centered on `(cx, cy)`. Pixels falling outside the canvas
/// are clipped.
pub fn draw_text_centered(canvas: &mut RgbaImage, text: &str, cx: u32, cy: u32, style: &TextStyle) {
    let width = i64::from(text_width(text, style.scale));
    let height = i64::from(GLYPH_SIZE * style.scale);
    let left = i64::from(cx) - width / 2;
    let top = i64::from(cy) - height / 2;

    let lit = lit_pixels(text);
    let scale = i64::from(style.scale);

    if style.stroke_width > 0 {
        let grow = i64::from(style.stroke_width);
        for &(gx, gy) in &lit {
            let x = left + gx * scale;
            let y = top + gy * scale;
            fill_block(canvas, x - grow, y - grow, scale + 2 * grow, style.stroke);
        }
    }
    for &(gx, gy) in &lit {
        fill_block(canvas, left + gx * scale, top + gy * scale, scale, style.fill);
    }
}

/// Glyph-grid coordinates of every lit pixel in `text`.
fn lit_pixels(text: &str) -> Vec<(i64, i64)> {
    let mut out = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let code = if ch.is_ascii() { ch as usize } else { '?' as usize };
        let glyph = BASIC_LEGACY[code];
        #[allow(clippy::cast_possible_wrap)]
        let base_x = (i as i64) * i64::from(GLYPH_SIZE);
        for (row, bits) in (0_i64..).zip(glyph.iter()) {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) != 0 {
                    out.push((base_x + i64::from(col), row));
                }
            }
        }
    }
    out
}

/// Fill a `size`×`size` square at `(x, y)`, clipped to the canvas.
fn fill_block(canvas: &mut RgbaImage, x: i64, y: i64, size: i64, color: Rgba<u8>) {
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let x0 = x.clamp(0, w);
    let y0 = y.clamp(0, h);
    let x1 = (x + size).clamp(0, w);
    let y1 = (y + size).clamp(0, h);
    for py in y0..y1 {
        for px in x0..x1 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Fill an arbitrary rectangle, clipped to the canvas.
pub fn fill_rect(canvas: &mut RgbaImage, rect: super::layout::Rect, color: Rgba<u8>) {
    let x1 = rect.x.saturating_add(rect.width).min(canvas.width());
    let y1 = rect.y.saturating_add(rect.height).min(canvas.height());
    for py in rect.y.min(y1)..y1 {
        for px in rect.x.min(x1)..x1 {
            canvas.put_pixel(px, py, color);
        }
    }
}
