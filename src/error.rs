//! Crate-wide error type.

use std::path::PathBuf;

/// Errors surfaced by encoding, rendering, file I/O and the clipboard.
///
/// Decode misses are not errors: a scan that finds no symbol returns `None`.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// The payload could not be encoded (usually: too long for version 40).
    #[error("failed to encode payload: {0}")]
    Encode(String),

    /// A grid size of zero was requested.
    #[error("grid size must be positive, got {0}")]
    InvalidGrid(usize),

    /// The bitmap has no pixels or its buffer does not match its dimensions.
    #[error("bitmap is empty or malformed ({width}x{height}, {len} bytes)")]
    EmptyBitmap {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Actual buffer length
        len: usize,
    },

    /// A colour string was not of the form `#rrggbb`.
    #[error("invalid colour {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// A render or export size outside the accepted range.
    #[error("invalid size {0}px")]
    InvalidSize(u32),

    /// The file is not an image this tool can read.
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// Image decoding or encoding failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The system clipboard rejected the request.
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

impl From<qrcode::types::QrError> for QrError {
    fn from(err: qrcode::types::QrError) -> Self {
        QrError::Encode(err.to_string())
    }
}

impl From<arboard::Error> for QrError {
    fn from(err: arboard::Error) -> Self {
        QrError::Clipboard(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, QrError>;
