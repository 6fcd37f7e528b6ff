//! QR symbol decoding
//!
//! - Locating an upright symbol and sampling its module grid
//! - Format and version information (BCH, nearest valid word)
//! - Unmasking, codeword extraction and block de-interleaving
//! - Reed-Solomon correction
//! - Segment decoding (numeric, alphanumeric, byte, ECI, Kanji)

/// Unmasking, zigzag codeword walk, block de-interleave and correction
pub mod codewords;
/// Format information (EC level, mask) and version information
pub mod format;
/// Function module mask (finders, timing, alignment, format, version)
pub mod function_mask;
/// Symbol location and module sampling
pub mod locate;
/// Segment decoding
pub mod payload;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Codeword capacity and block tables
pub mod tables;

use crate::models::{BitMatrix, DecodedQr, Version};
use crate::utils::binarization::otsu_binarize;
use crate::utils::grayscale::to_grayscale;
use format::{FormatInfo, read_version};

/// Message shown when an image holds no readable symbol
pub const NO_QR_FOUND: &str = "No QR code found.";

/// Turns an image into the text of the symbol it shows.
pub trait QrDecoder {
    /// Decode an RGBA8 buffer of `width` x `height` pixels
    fn decode(&self, rgba: &[u8], width: usize, height: usize) -> Option<DecodedQr>;
}

/// [`QrDecoder`] for upright, axis-aligned symbols such as renders,
/// screenshots and exported files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridDecoder;

impl GridDecoder {
    /// Decode a module grid directly (one entry per module, true = dark)
    pub fn decode_modules(modules: &BitMatrix) -> Option<DecodedQr> {
        let version = Version::from_width(modules.width())?;
        let format = FormatInfo::read(modules)?;
        let info = tables::ec_block_info(version, format.ec_level);
        log::debug!(
            "version {} EC {:?} mask {:?}",
            version.number(),
            format.ec_level,
            format.mask
        );

        let raw = codewords::read_codewords(modules, version, format.mask, info.total_codewords);
        let data = codewords::correct_blocks(&raw, version, format.ec_level)?;
        let payload = payload::decode_payload(&data, version)?;
        Some(DecodedQr {
            data: payload.data,
            content: payload.content,
            version,
            ec_level: format.ec_level,
            mask: format.mask,
        })
    }
}

impl QrDecoder for GridDecoder {
    fn decode(&self, rgba: &[u8], width: usize, height: usize) -> Option<DecodedQr> {
        if width == 0 || height == 0 || rgba.len() < width * height * 4 {
            log::debug!("buffer too small for {width}x{height}");
            return None;
        }
        let gray = to_grayscale(rgba, width, height);
        let binary = otsu_binarize(&gray, width, height);
        let region = locate::locate(&binary)?;

        for dimension in region.candidate_dimensions() {
            let mut grid = locate::sample_grid(&binary, &region, dimension);
            let errors = locate::timing_errors(&grid);
            log::trace!("dimension {dimension}: {errors} timing errors");
            if errors > dimension / 4 {
                continue;
            }
            // Version areas outrank the pitch estimate for large symbols.
            if let Some(version) = read_version(&grid) {
                if version.width() != dimension {
                    grid = locate::sample_grid(&binary, &region, version.width());
                }
            }
            if let Some(decoded) = Self::decode_modules(&grid) {
                return Some(decoded);
            }
        }
        log::debug!("no candidate grid decoded");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{QrEncoder, QrcodeEncoder, render_bitmap};
    use crate::models::{Bitmap, ECLevel, Rgb};

    fn encode(text: &str, level: ECLevel) -> crate::encoder::EncodedSymbol {
        QrcodeEncoder.encode(text, level).unwrap()
    }

    #[test]
    fn test_decode_modules_of_every_level() {
        for level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            let symbol = encode("https://example.com", level);
            let decoded = GridDecoder::decode_modules(symbol.modules()).unwrap();
            assert_eq!(decoded.content, "https://example.com");
            assert_eq!(decoded.ec_level, level);
            assert_eq!(decoded.version, symbol.version());
        }
    }

    #[test]
    fn test_decode_numeric_and_alphanumeric() {
        for text in ["0123456789012345", "HELLO WORLD $%*+-./:"] {
            let symbol = encode(text, ECLevel::M);
            let decoded = GridDecoder::decode_modules(symbol.modules()).unwrap();
            assert_eq!(decoded.content, text);
        }
    }

    #[test]
    fn test_decode_corrects_damaged_modules() {
        let symbol = encode("particles", ECLevel::H);
        let mut modules = symbol.modules().clone();
        // a few data modules in the lower right
        let n = modules.width();
        for (x, y) in [(n - 1, n - 1), (n - 2, n - 3), (n - 4, n - 2), (n - 5, n - 6)] {
            modules.toggle(x, y);
        }
        let decoded = GridDecoder::decode_modules(&modules).unwrap();
        assert_eq!(decoded.content, "particles");
    }

    #[test]
    fn test_decode_render() {
        let symbol = encode("https://example.com", ECLevel::H);
        let bmp = render_bitmap(&symbol, 256, Rgb::BLACK, Rgb::WHITE).unwrap();
        let decoded = GridDecoder.decode(bmp.as_rgba(), 256, 256).unwrap();
        assert_eq!(decoded.content, "https://example.com");
    }

    #[test]
    fn test_decode_with_quiet_zone_and_colours() {
        let symbol = encode("themed", ECLevel::Q);
        let fg = Rgb::new(0x1e, 0x3a, 0x8a);
        let bg = Rgb::new(0xdb, 0xea, 0xfe);
        let inner = render_bitmap(&symbol, 210, fg, bg).unwrap();
        let mut canvas = Bitmap::filled(290, 290, bg);
        for y in 0..210 {
            for x in 0..210 {
                canvas.put(x + 40, y + 40, inner.pixel(x, y));
            }
        }
        let decoded = GridDecoder.decode(canvas.as_rgba(), 290, 290).unwrap();
        assert_eq!(decoded.content, "themed");
    }

    #[test]
    fn test_decode_large_version() {
        let text = "https://example.com/".repeat(12);
        let symbol = encode(&text, ECLevel::M);
        assert!(symbol.version().number() >= 7);
        let size = (symbol.width() * 4) as u32;
        let bmp = render_bitmap(&symbol, size, Rgb::BLACK, Rgb::WHITE).unwrap();
        let decoded = GridDecoder.decode(bmp.as_rgba(), size as usize, size as usize).unwrap();
        assert_eq!(decoded.content, text);
    }

    #[test]
    fn test_decode_modules_of_versions_36_and_39() {
        for number in [36i16, 39] {
            let text = format!("version {number} symbol");
            let code = qrcode::QrCode::with_version(
                text.as_bytes(),
                qrcode::Version::Normal(number),
                qrcode::EcLevel::L,
            )
            .unwrap();
            let width = code.width();
            let colors = code.to_colors();
            let modules = BitMatrix::from_fn(width, width, |x, y| {
                colors[y * width + x] == qrcode::Color::Dark
            });
            let decoded = GridDecoder::decode_modules(&modules).unwrap();
            assert_eq!(decoded.version.number() as i16, number);
            assert_eq!(decoded.content, text);
        }
    }

    #[test]
    fn test_blank_and_short_buffers() {
        let blank = Bitmap::filled(64, 64, Rgb::WHITE);
        assert_eq!(GridDecoder.decode(blank.as_rgba(), 64, 64), None);
        assert_eq!(GridDecoder.decode(&[0; 12], 2, 2), None);
        assert_eq!(GridDecoder.decode(&[], 0, 0), None);
    }
}
