//! qr_reveal - QR code generation and scanning with a particle-assembly reveal
//!
//! Symbols are encoded with the `qrcode` crate, rendered to RGBA bitmaps or
//! SVG, and decoded back with an upright-symbol decoder. Every new render
//! can be revealed by sampling it into per-module particles that fly in on
//! a staggered schedule before the real render is shown.

/// Application state (theme, tabs, generator and scanner views)
pub mod app;
/// Sizes, timing constants and environment overrides
pub mod config;
/// QR decoding (location, format, Reed-Solomon, segments)
pub mod decoder;
/// QR encoding and rendering
pub mod encoder;
/// Crate-wide error type
pub mod error;
/// Core data structures (Bitmap, BitMatrix, Particle, etc.)
pub mod models;
/// Particle sampling, reveal sequencing and motion
pub mod reveal;
/// Export, import, clipboard and link helpers
pub mod tools;
/// Grayscale conversion and binarization
pub mod utils;

pub use decoder::{GridDecoder, NO_QR_FOUND, QrDecoder};
pub use encoder::{EncodedSymbol, QrEncoder, QrcodeEncoder, render_bitmap, render_svg};
pub use error::{QrError, Result};
pub use models::{
    BitMatrix, Bitmap, Cell, DecodedQr, ECLevel, MaskPattern, Particle, ParticleField, Point, Rgb,
    Version,
};
pub use reveal::{RevealOrchestrator, RevealState, SettleTimer, sample_particles};

use std::path::Path;

/// Encode `payload` at `ec_level` with the default encoder
pub fn encode(payload: &str, ec_level: ECLevel) -> Result<EncodedSymbol> {
    QrcodeEncoder.encode(payload, ec_level)
}

/// Decode a symbol from an RGBA8 image
///
/// # Arguments
/// * `rgba` - Raw RGBA bytes (4 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// The decoded symbol, or `None` if none could be read
pub fn decode(rgba: &[u8], width: usize, height: usize) -> Option<DecodedQr> {
    GridDecoder.decode(rgba, width, height)
}

/// Load an image file (downscaled per `QR_MAX_DIM`) and decode it.
///
/// `Ok(None)` means the image was read but held no readable symbol.
pub fn decode_file(path: &Path) -> Result<Option<DecodedQr>> {
    let bitmap = tools::import::load_rgba(path, config::max_dim_from_env())?;
    Ok(decode(bitmap.as_rgba(), bitmap.width(), bitmap.height()))
}

/// Encode, render black on white at `display_size` and sample the render
/// into particles, using the symbol's own module count as the grid.
pub fn particles_for(payload: &str, ec_level: ECLevel, display_size: u32) -> Result<ParticleField> {
    let symbol = encode(payload, ec_level)?;
    let bitmap = render_bitmap(&symbol, display_size, Rgb::BLACK, Rgb::WHITE)?;
    sample_particles(&bitmap, symbol.width(), display_size as f32)
}
