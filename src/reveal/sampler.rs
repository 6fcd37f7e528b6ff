//! Bitmap sampling for the staggered reveal.
//!
//! A rendered symbol is read back one pixel per module, at the centre of the
//! module's footprint, and every dark module becomes a [`Particle`]. Each
//! particle's start delay grows towards the centre of the grid so the symbol
//! assembles from the outside in and the middle lands last.

use crate::error::{QrError, Result};
use crate::models::{BitMatrix, Bitmap, Particle, ParticleField, Point};

/// Red channel values below this count as dark
pub const DARK_THRESHOLD: u8 = 128;
/// Largest start delay handed to any particle, in seconds
pub const MAX_DELAY_SECONDS: f32 = 0.3;
/// Module count of a version 3 symbol
pub const GRID_SIZE_V3: usize = 29;

/// Pixel sampled for module (col, row): the centre of its footprint.
pub fn sample_point(
    col: usize,
    row: usize,
    grid_size: usize,
    width: usize,
    height: usize,
) -> (usize, usize) {
    let n = grid_size as f64;
    let x = (((col as f64 + 0.5) / n) * width as f64).floor() as usize;
    let y = (((row as f64 + 0.5) / n) * height as f64).floor() as usize;
    (x.min(width - 1), y.min(height - 1))
}

/// Classify every module of a `grid_size`-square grid as dark or light.
pub fn classify_modules(bitmap: &Bitmap, grid_size: usize) -> Result<BitMatrix> {
    if grid_size == 0 {
        return Err(QrError::InvalidGrid(grid_size));
    }
    let (w, h) = (bitmap.width(), bitmap.height());
    if w == 0 || h == 0 {
        return Err(QrError::EmptyBitmap {
            width: w,
            height: h,
            len: bitmap.as_rgba().len(),
        });
    }
    Ok(BitMatrix::from_fn(grid_size, grid_size, |col, row| {
        let (x, y) = sample_point(col, row, grid_size, w, h);
        bitmap.red(x, y) < DARK_THRESHOLD
    }))
}

/// Start delay for the module at (col, row).
///
/// `1 - distance_to_centre / half_diagonal`, scaled to [`MAX_DELAY_SECONDS`]:
/// the exact centre waits longest, the far corners start immediately.
pub fn particle_delay(col: usize, row: usize, grid_size: usize) -> f32 {
    let half = grid_size as f32 / 2.0;
    let dx = col as f32 - half;
    let dy = row as f32 - half;
    let center_offset = (dx * dx + dy * dy).sqrt();
    let max_offset = std::f32::consts::SQRT_2 * half;
    let normalized = 1.0 - center_offset / max_offset;
    (normalized * MAX_DELAY_SECONDS).clamp(0.0, MAX_DELAY_SECONDS)
}

/// Sample a rendered symbol into particles.
///
/// `grid_size` must equal the symbol's true module count; a mismatch is not
/// detected and produces a misaligned field. `display_size` is the edge, in
/// pixels, of the area the particles will be laid out in.
pub fn sample_particles(
    bitmap: &Bitmap,
    grid_size: usize,
    display_size: f32,
) -> Result<ParticleField> {
    let modules = classify_modules(bitmap, grid_size)?;
    let module_size = display_size / grid_size as f32;

    let mut particles = Vec::with_capacity(modules.count_set());
    for row in 0..grid_size {
        for col in 0..grid_size {
            if !modules.get(col, row) {
                continue;
            }
            particles.push(Particle {
                id: row * grid_size + col,
                col,
                row,
                position: Point::new(col as f32 * module_size, row as f32 * module_size),
                size: module_size,
                delay: particle_delay(col, row, grid_size),
            });
        }
    }

    log::trace!(
        "sampled {} dark modules from {}x{} bitmap on a {}-module grid",
        particles.len(),
        bitmap.width(),
        bitmap.height(),
        grid_size
    );

    Ok(ParticleField {
        particles,
        module_size,
        grid_size,
    })
}
