//! Generator settings, reveal timing and environment overrides.

use crate::error::{QrError, Result};
use crate::models::{ECLevel, Rgb};
use std::env;
use std::time::Duration;

/// Smallest selectable render size in pixels
pub const MIN_SIZE: u32 = 128;
/// Largest selectable render size in pixels
pub const MAX_SIZE: u32 = 1024;
/// Size slider granularity
pub const SIZE_STEP: u32 = 32;
/// Initial render size
pub const DEFAULT_SIZE: u32 = 256;
/// On-screen preview is never drawn larger than this
pub const MAX_DISPLAY_SIZE: u32 = 400;
/// Payload shown before the user types anything
pub const DEFAULT_PAYLOAD: &str = "https://example.com";

/// Timing of the reveal animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTiming {
    /// How long one particle takes to fly in
    pub animation: Duration,
    /// Largest per-particle start delay
    pub max_delay: Duration,
    /// Slack after the last particle lands
    pub buffer: Duration,
}

impl RevealTiming {
    /// Wall-clock time from trigger to settle
    pub fn settle_after(&self) -> Duration {
        self.animation + self.max_delay + self.buffer
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            animation: Duration::from_millis(1000),
            max_delay: Duration::from_millis(300),
            buffer: Duration::from_millis(100),
        }
    }
}

/// Everything the generator needs to produce a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Text to encode
    pub payload: String,
    /// Export size in pixels, a multiple of [`SIZE_STEP`] in `[MIN_SIZE, MAX_SIZE]`
    pub size: u32,
    /// Dark module colour
    pub foreground: Rgb,
    /// Light module colour
    pub background: Rgb,
    /// Error correction level
    pub ec_level: ECLevel,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            payload: DEFAULT_PAYLOAD.to_string(),
            size: size_from_env().unwrap_or(DEFAULT_SIZE),
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            ec_level: ECLevel::H,
        }
    }
}

impl GeneratorSettings {
    /// Preview size: the export size capped at [`MAX_DISPLAY_SIZE`]
    pub fn display_size(&self) -> u32 {
        self.size.min(MAX_DISPLAY_SIZE)
    }

    /// Set the export size, snapping down to the slider step
    pub fn set_size(&mut self, size: u32) -> Result<()> {
        self.size = snap_size(size)?;
        Ok(())
    }
}

/// Validate a size and snap it down to a multiple of [`SIZE_STEP`].
pub fn snap_size(size: u32) -> Result<u32> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(QrError::InvalidSize(size));
    }
    Ok(MIN_SIZE + (size - MIN_SIZE) / SIZE_STEP * SIZE_STEP)
}

/// Import downscale limit from `QR_MAX_DIM`; unset or `0` means no limit.
pub fn max_dim_from_env() -> Option<u32> {
    match env::var("QR_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Default render size from `QR_DEFAULT_SIZE`, if set and valid.
pub fn size_from_env() -> Option<u32> {
    env::var("QR_DEFAULT_SIZE")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .and_then(|v| snap_size(v).ok())
}

/// Debug logging flag from `QR_DEBUG`.
pub fn debug_from_env() -> bool {
    env::var("QR_DEBUG").is_ok()
}
