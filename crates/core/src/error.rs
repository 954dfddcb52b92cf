//! Error types for chart rendering and deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing or reading the strategy artifacts.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to rasterise a chart figure.
    #[error("Chart rendering error: {0}")]
    RenderError(String),

    /// An embedded image could not be decoded or encoded.
    #[error("Image error: {0}")]
    ImageError(String),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}
