//! Incremental PDF writer used to render invoices.
//!
//! Builtin Helvetica faces (WinAnsi encoded), embedded TrueType fonts,
//! JPEG/PNG images and basic vector graphics. Pages stream to the
//! underlying writer as they are finished.

pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod truetype;
pub mod writer;

pub use document::PdfDocument;
pub use error::PdfError;
pub use fonts::{BuiltinFont, FontMetrics, FontRef, TextStyle, TrueTypeFontId};
pub use graphics::{Color, Rect};
pub use images::{ImageAnchor, ImageId};
