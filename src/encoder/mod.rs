//! QR symbol encoding
//!
//! Encoding itself is delegated to the `qrcode` crate behind the
//! [`QrEncoder`] seam; this module owns the resulting module grid and its
//! rendering to pixels and SVG.

pub mod render;

pub use render::{render_bitmap, render_svg};

use crate::error::{QrError, Result};
use crate::models::{BitMatrix, ECLevel, Version};

/// An encoded symbol: its module grid and the parameters the encoder chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymbol {
    modules: BitMatrix,
    version: Version,
    ec_level: ECLevel,
}

impl EncodedSymbol {
    /// Wrap a square module grid. Fails if the grid width is not a valid
    /// symbol width.
    pub fn new(modules: BitMatrix, ec_level: ECLevel) -> Result<Self> {
        let width = modules.width();
        let version = Version::from_width(width)
            .filter(|_| modules.height() == width)
            .ok_or(QrError::InvalidGrid(width))?;
        Ok(Self {
            modules,
            version,
            ec_level,
        })
    }

    /// Modules per side; this is the grid size to sample renders with
    pub fn width(&self) -> usize {
        self.modules.width()
    }

    /// Module grid, true = dark
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }

    /// Symbol version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Error correction level
    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    /// Whether module (col, row) is dark
    pub fn is_dark(&self, col: usize, row: usize) -> bool {
        self.modules.get(col, row)
    }
}

/// Turns payload text into a symbol.
pub trait QrEncoder {
    /// Encode `payload` at the given error correction level
    fn encode(&self, payload: &str, ec_level: ECLevel) -> Result<EncodedSymbol>;
}

/// [`QrEncoder`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeEncoder;

impl QrEncoder for QrcodeEncoder {
    fn encode(&self, payload: &str, ec_level: ECLevel) -> Result<EncodedSymbol> {
        // An empty string still gets a symbol: a single space.
        let text = if payload.is_empty() { " " } else { payload };
        let code = qrcode::QrCode::with_error_correction_level(text.as_bytes(), ec_level.into())?;

        let width = code.width();
        let colors = code.to_colors();
        let modules =
            BitMatrix::from_fn(width, width, |x, y| colors[y * width + x] == qrcode::Color::Dark);
        let symbol = EncodedSymbol::new(modules, code.error_correction_level().into())?;

        log::debug!(
            "encoded {} bytes as version {} ({}x{} modules, EC {:?})",
            text.len(),
            symbol.version().number(),
            width,
            width,
            symbol.ec_level()
        );
        Ok(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_fits_version_3_at_high_ec() {
        let symbol = QrcodeEncoder
            .encode("https://example.com", ECLevel::H)
            .unwrap();
        assert_eq!(symbol.width(), 29);
        assert_eq!(symbol.version().number(), 3);
        assert_eq!(symbol.ec_level(), ECLevel::H);
    }

    #[test]
    fn test_longer_payload_grows_the_grid() {
        let long = "https://example.com/".repeat(8);
        let symbol = QrcodeEncoder.encode(&long, ECLevel::H).unwrap();
        assert!(symbol.width() > 29);
    }

    #[test]
    fn test_finder_corner_is_dark() {
        let symbol = QrcodeEncoder.encode("hello", ECLevel::M).unwrap();
        let n = symbol.width();
        assert!(symbol.is_dark(0, 0));
        assert!(symbol.is_dark(n - 1, 0));
        assert!(symbol.is_dark(0, n - 1));
        assert!(!symbol.is_dark(7, 7));
    }

    #[test]
    fn test_empty_payload_is_encoded_as_space() {
        let empty = QrcodeEncoder.encode("", ECLevel::H).unwrap();
        let space = QrcodeEncoder.encode(" ", ECLevel::H).unwrap();
        assert_eq!(empty, space);
    }

    #[test]
    fn test_oversized_payload_fails() {
        let huge = "x".repeat(4000);
        assert!(matches!(
            QrcodeEncoder.encode(&huge, ECLevel::H),
            Err(QrError::Encode(_))
        ));
    }

    #[test]
    fn test_non_square_grid_is_rejected() {
        assert!(EncodedSymbol::new(BitMatrix::new(21, 25), ECLevel::L).is_err());
        assert!(EncodedSymbol::new(BitMatrix::square(22), ECLevel::L).is_err());
    }
}
