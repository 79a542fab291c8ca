//! Error model for invoice rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tradebill_pdf::PdfError;

/// Result type used across the crate.
pub type InvoiceResult<T> = Result<T, InvoiceError>;

/// Startup-time configuration problems. These are programming or
/// deployment errors, never per-document conditions.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Page geometry constants contradict each other.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// Document defaults that could never produce a valid invoice.
    #[error("invalid invoice defaults: {0}")]
    Defaults(String),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }
}

/// Failure producing an invoice document.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The invoice data was rejected before layout began.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A required asset (a configured font) could not be read or parsed.
    #[error("asset {path} unusable: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: PdfError,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serializing the PDF into memory failed.
    #[error("pdf rendering failed: {0}")]
    Render(#[from] io::Error),
}

impl InvoiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
