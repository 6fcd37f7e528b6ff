//! RGBA pixel buffers and colours.

use crate::error::{QrError, Result};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Black
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// White
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(QrError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| QrError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA with full opacity
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl std::str::FromStr for Rgb {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        Rgb::from_hex(s)
    }
}

/// A rendered image: RGBA8, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap an RGBA buffer. Fails when the buffer length does not match
    /// `width * height * 4` or either dimension is zero.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height * 4 {
            return Err(QrError::EmptyBitmap {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// A bitmap filled with one colour
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        let data = color.to_rgba().repeat(width * height);
        Self { width, height, data }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// RGBA of the pixel at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Red channel of the pixel at (x, y)
    pub fn red(&self, x: usize, y: usize) -> u8 {
        self.data[(y * self.width + x) * 4]
    }

    /// Overwrite the pixel at (x, y); out-of-bounds writes are ignored
    pub fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 4;
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Fill the rectangle `[x0, x1) x [y0, y1)`, clipped to the image
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: Rgb) {
        let rgba = color.to_rgba();
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let i = (y * self.width + x) * 4;
                self.data[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Consume into an `image` buffer
    pub fn into_image(self) -> image::RgbaImage {
        // Dimensions and length were validated at construction.
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.data)
            .unwrap_or_default()
    }

    /// Copy out of an `image` buffer
    pub fn from_image(img: &image::RgbaImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba(w as usize, h as usize, img.as_raw().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Rgb::from_hex("#1A2b3C").unwrap();
        assert_eq!(c, Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_hex(), "#1a2b3c");
        assert_eq!(Rgb::from_hex("ffffff").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_from_rgba_validates_length() {
        assert!(Bitmap::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Bitmap::from_rgba(2, 2, vec![0; 15]),
            Err(QrError::EmptyBitmap { len: 15, .. })
        ));
        assert!(Bitmap::from_rgba(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut bmp = Bitmap::filled(4, 4, Rgb::WHITE);
        bmp.fill_rect(2, 2, 10, 10, Rgb::BLACK);
        assert_eq!(bmp.red(3, 3), 0);
        assert_eq!(bmp.red(1, 1), 255);
        assert_eq!(bmp.pixel(3, 3), [0, 0, 0, 255]);
    }
}
