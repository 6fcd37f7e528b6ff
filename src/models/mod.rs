pub mod bitmap;
pub mod matrix;
pub mod particle;
pub mod point;
pub mod qr_code;

pub use bitmap::{Bitmap, Rgb};
pub use matrix::BitMatrix;
pub use particle::{Cell, Particle, ParticleField};
pub use point::Point;
pub use qr_code::{DecodedQr, ECLevel, MaskPattern, Version};
