//! Scanner view: image in, decoded text or an error message out

use crate::decoder::{NO_QR_FOUND, QrDecoder};
use crate::error::{QrError, Result};
use crate::models::Bitmap;
use crate::tools::clipboard::Clipboard;
use crate::tools::import::{is_image_path, load_rgba};
use crate::tools::link::ScannedText;
use std::path::Path;

/// Outcome of the last scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Found { text: String, kind: ScannedText },
    NotFound,
}

impl ScanOutcome {
    /// Text to show: the decoded content or the not-found message
    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::Found { text, .. } => text,
            ScanOutcome::NotFound => NO_QR_FOUND,
        }
    }
}

/// State behind the scan tab
#[derive(Debug, Clone, Default)]
pub struct ScannerView {
    outcome: Option<ScanOutcome>,
}

impl ScannerView {
    pub fn outcome(&self) -> Option<&ScanOutcome> {
        self.outcome.as_ref()
    }

    /// Decoded text of the last successful scan
    pub fn result(&self) -> Option<&str> {
        match &self.outcome {
            Some(ScanOutcome::Found { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Error message of the last failed scan
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(ScanOutcome::NotFound) => Some(NO_QR_FOUND),
            _ => None,
        }
    }

    /// Whether the last result opens as a link
    pub fn is_link(&self) -> bool {
        matches!(&self.outcome, Some(ScanOutcome::Found { kind, .. }) if kind.is_link())
    }

    /// Decode a bitmap and record the outcome
    pub fn scan_bitmap(&mut self, bitmap: &Bitmap, decoder: &impl QrDecoder) -> &ScanOutcome {
        let outcome = match decoder.decode(bitmap.as_rgba(), bitmap.width(), bitmap.height()) {
            Some(decoded) => {
                log::info!(
                    "decoded {} bytes (version {})",
                    decoded.data.len(),
                    decoded.version.number()
                );
                ScanOutcome::Found {
                    kind: ScannedText::classify(&decoded.content),
                    text: decoded.content,
                }
            }
            None => ScanOutcome::NotFound,
        };
        self.outcome.insert(outcome)
    }

    /// Load and decode an image file. Files that are not images are
    /// rejected without touching the current outcome.
    pub fn scan_file(
        &mut self,
        path: &Path,
        decoder: &impl QrDecoder,
        max_dim: Option<u32>,
    ) -> Result<&ScanOutcome> {
        if !is_image_path(path) {
            return Err(QrError::UnsupportedFile(path.to_path_buf()));
        }
        let bitmap = load_rgba(path, max_dim)?;
        Ok(self.scan_bitmap(&bitmap, decoder))
    }

    /// Put the last result on the clipboard. Returns `false` if there is
    /// nothing to copy.
    pub fn copy_result(&self, clipboard: &mut impl Clipboard) -> Result<bool> {
        match self.result() {
            Some(text) => {
                clipboard.set_text(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn clear(&mut self) {
        self.outcome = None;
    }
}
