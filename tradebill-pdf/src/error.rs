use std::io;

use thiserror::Error;

/// Failures loading the assets a document embeds. Writing itself
/// reports plain `io::Error`.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The bytes are not a JPEG or PNG, or use a layout PDF cannot carry.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The image header or pixel data could not be decoded.
    #[error("image decode failed: {0}")]
    ImageDecode(String),

    /// A TrueType file could not be parsed.
    #[error("font parse failed: {0}")]
    FontParse(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
