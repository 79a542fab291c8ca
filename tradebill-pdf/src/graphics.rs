/// RGB color for PDF graphics operations.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from RGB components (each 0.0–1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a color from 8-bit channels, e.g. `(120, 120, 120)`.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Create a grayscale color (r = g = b = level).
    pub fn gray(level: f64) -> Self {
        Color {
            r: level,
            g: level,
            b: level,
        }
    }
}

/// A rectangle with an upper-left origin: `y` is measured downward
/// from the top edge of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Bottom edge (upper-left coordinates).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Convert to PDF's bottom-left origin for a page of the given height.
    /// Returns `(x, y)` of the lower-left corner.
    pub fn to_pdf_origin(&self, page_height: f64) -> (f64, f64) {
        (self.x, page_height - self.bottom())
    }
}
