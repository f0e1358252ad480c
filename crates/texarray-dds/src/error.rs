//! Error types for DDS handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::{ElementType, PixelFormat};

/// Errors that can occur when loading or saving DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file to load does not exist or cannot be opened.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid magic, header size, or a file truncated inside its headers.
    #[error("malformed DDS header: {0}")]
    MalformedHeader(String),

    /// Pixel format outside the supported catalog.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Image element type or channel count disagrees with the target format.
    #[error(
        "cannot save {actual_channels}-channel {actual_type} image as {format} \
         (expects {expected_channels}-channel {expected_type})"
    )]
    FormatMismatch {
        format: PixelFormat,
        expected_channels: usize,
        expected_type: ElementType,
        actual_channels: usize,
        actual_type: ElementType,
    },

    /// Image dimensions that a DDS header cannot describe.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Channel count outside 1..=4.
    #[error("unsupported channel count {0}, expected 1 to 4")]
    InvalidChannels(usize),

    /// Element count does not match height * width * channels.
    #[error("image data holds {actual} elements, shape requires {expected}")]
    InvalidShape { expected: usize, actual: usize },

    /// Pixel payload shorter than the header describes.
    #[error("truncated pixel payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    /// Requested array layer or cube face does not exist.
    #[error("layer {index} out of range: file has {count} layers")]
    LayerOutOfRange { index: usize, count: usize },
}

impl From<texarray_common::Error> for Error {
    fn from(err: texarray_common::Error) -> Self {
        match err {
            texarray_common::Error::Io(io) => Error::Io(io),
            other => Error::MalformedHeader(other.to_string()),
        }
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
