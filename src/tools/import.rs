//! Loading images for scanning

use crate::error::{QrError, Result};
use crate::models::Bitmap;
use image::GenericImageView;
use std::path::Path;

/// Raster formats the scanner accepts
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

/// Whether `path` names a raster image the scanner can read
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Whether a MIME type is an image type (`image/*`)
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Decode an image file to RGBA, shrinking it so neither side exceeds
/// `max_dim` when a limit is given.
pub fn load_rgba(path: &Path, max_dim: Option<u32>) -> Result<Bitmap> {
    if !is_image_path(path) {
        return Err(QrError::UnsupportedFile(path.to_path_buf()));
    }
    let img = image::open(path)?;
    let img = match max_dim {
        Some(limit) if img.dimensions().0.max(img.dimensions().1) > limit => {
            log::debug!("downscaling {:?} to fit {limit}px", img.dimensions());
            img.resize(limit, limit, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    Bitmap::from_image(&img.to_rgba8())
}

/// Decode in-memory image bytes (any format `image` recognises) to RGBA.
pub fn load_rgba_from_memory(bytes: &[u8], max_dim: Option<u32>) -> Result<Bitmap> {
    let img = image::load_from_memory(bytes)?;
    let img = match max_dim {
        Some(limit) if img.width().max(img.height()) > limit => {
            img.resize(limit, limit, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    Bitmap::from_image(&img.to_rgba8())
}
