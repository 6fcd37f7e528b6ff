//! Image helpers for the scan path
//!
//! - Grayscale conversion (RGBA to luminance, rayon for large images)
//! - Binarization (Otsu's method and fixed threshold)

pub mod binarization;
pub mod grayscale;
