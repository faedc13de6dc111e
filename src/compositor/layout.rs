//! Grid geometry for the collage canvas.
//!
//! Every cell is a label strip of `text_height` over an `image_size`
//! square. Cells are laid out row-major, three per row, with `padding`
//! between cells and around the edges. A header band of `header_height`
//! sits above the first row.

/// Side of each image square, in pixels.
pub const IMAGE_SIZE: u32 = 300;
/// Gap between cells and around the grid edge.
pub const PADDING: u32 = 20;
/// Height of the label strip above each image.
pub const TEXT_HEIGHT: u32 = 40;
/// Height of the title band at the top of the canvas.
pub const HEADER_HEIGHT: u32 = 60;
/// Cells per row (and rows per grid).
pub const GRID_COLUMNS: u32 = 3;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub image_size: u32,
    pub padding: u32,
    pub text_height: u32,
    pub header_height: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { image_size: IMAGE_SIZE, padding: PADDING, text_height: TEXT_HEIGHT, header_height: HEADER_HEIGHT }
    }
}

impl GridLayout {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image_size * GRID_COLUMNS + self.padding * (GRID_COLUMNS + 1)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.header_height + (self.image_size + self.text_height) * GRID_COLUMNS + self.padding * (GRID_COLUMNS + 1)
    }

    /// Anchor point for the title line.
    #[must_use]
    pub fn header_center(&self) -> (u32, u32) {
        (self.width() / 2, self.header_height / 2)
    }

    /// Top-left corner of cell `index` (registry order, row-major).
    #[must_use]
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        #[allow(clippy::cast_possible_truncation)]
        let index = index as u32;
        let row = index / GRID_COLUMNS;
        let col = index % GRID_COLUMNS;
        let x = self.padding + col * (self.image_size + self.padding);
        let y = self.header_height + self.padding + row * (self.image_size + self.text_height + self.padding);
        (x, y)
    }

    /// Label strip of cell `index`.
    #[must_use]
    pub fn label_rect(&self, index: usize) -> Rect {
        let (x, y) = self.cell_origin(index);
        Rect { x, y, width: self.image_size, height: self.text_height }
    }

    /// Anchor point for the label text of cell `index`.
    #[must_use]
    pub fn label_center(&self, index: usize) -> (u32, u32) {
        let (x, y) = self.cell_origin(index);
        (x + self.image_size / 2, y + self.text_height / 2)
    }

    /// Square the image of cell `index` is stretched into.
    #[must_use]
    pub fn image_rect(&self, index: usize) -> Rect {
        let (x, y) = self.cell_origin(index);
        Rect { x, y: y + self.text_height, width: self.image_size, height: self.image_size }
    }
}
