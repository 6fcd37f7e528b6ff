//! Luminance conversion for the scan path
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, computed in fixed point as
//! (76*R + 150*G + 29*B) >> 8.

use rayon::prelude::*;

const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Images with at least this many pixels are converted row-parallel
pub const PARALLEL_THRESHOLD: usize = 256 * 256;

/// Fixed-point luminance of one pixel
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

fn convert_row(rgba: &[u8], row: &mut [u8]) {
    for (out, px) in row.iter_mut().zip(rgba.chunks_exact(4)) {
        *out = luminance(px[0], px[1], px[2]);
    }
}

/// Convert an RGBA8 buffer to one luminance byte per pixel (alpha ignored).
///
/// `rgba` must hold at least `width * height * 4` bytes; missing trailing
/// pixels stay black.
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    for (row, src) in gray.chunks_mut(width).zip(rgba.chunks(width * 4)) {
        convert_row(src, row);
    }
    gray
}

/// Row-parallel variant of [`rgba_to_grayscale`]
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    gray.par_chunks_mut(width)
        .zip(rgba.par_chunks(width * 4))
        .for_each(|(row, src)| convert_row(src, row));
    gray
}

/// Pick the sequential or parallel conversion by image size
pub fn to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    if width * height >= PARALLEL_THRESHOLD {
        rgba_to_grayscale_parallel(rgba, width, height)
    } else {
        rgba_to_grayscale(rgba, width, height)
    }
}
