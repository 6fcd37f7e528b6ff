//! Writing a symbol to PNG, JPEG or SVG

use crate::config::GeneratorSettings;
use crate::encoder::{EncodedSymbol, render_bitmap, render_svg};
use crate::error::{QrError, Result};
use crate::models::{Bitmap, Rgb};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Base name of every exported file
pub const EXPORT_STEM: &str = "qrcode";

/// JPEG quality for exports (1-100)
pub const JPEG_QUALITY: u8 = 100;

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpg,
    Svg,
}

impl ExportFormat {
    /// All formats, in menu order
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpg, ExportFormat::Svg];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
        }
    }

    /// `qrcode.<ext>`
    pub fn file_name(self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(QrError::UnsupportedFile(PathBuf::from(s))),
        }
    }
}

/// Replace transparency with `background` (JPEG has no alpha channel) and
/// drop the alpha channel.
pub fn flatten(bitmap: &Bitmap, background: Rgb) -> Vec<u8> {
    let bg = [background.r, background.g, background.b];
    bitmap
        .as_rgba()
        .chunks_exact(4)
        .flat_map(|px| {
            let alpha = px[3] as u32;
            let mix = move |i: usize| {
                ((px[i] as u32 * alpha + bg[i] as u32 * (255 - alpha) + 127) / 255) as u8
            };
            [mix(0), mix(1), mix(2)]
        })
        .collect()
}

/// Encode `symbol` as the bytes of a file in `format`.
pub fn export_bytes(
    symbol: &EncodedSymbol,
    settings: &GeneratorSettings,
    format: ExportFormat,
) -> Result<Vec<u8>> {
    let (fg, bg, size) = (settings.foreground, settings.background, settings.size);
    let mut out = Vec::new();
    match format {
        ExportFormat::Svg => out = render_svg(symbol, size, fg, bg).into_bytes(),
        ExportFormat::Png => {
            let bitmap = render_bitmap(symbol, size, fg, bg)?;
            PngEncoder::new(&mut out).write_image(bitmap.as_rgba(), size, size, ColorType::Rgba8)?
        }
        ExportFormat::Jpg => {
            let rgb = flatten(&render_bitmap(symbol, size, fg, bg)?, bg);
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .write_image(&rgb, size, size, ColorType::Rgb8)?
        }
    }
    Ok(out)
}

/// Write `qrcode.<ext>` into `dir`, returning its path.
pub fn export_to_dir(
    symbol: &EncodedSymbol,
    settings: &GeneratorSettings,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf> {
    let bytes = export_bytes(symbol, settings, format)?;
    let path = dir.join(format.file_name());
    fs::write(&path, bytes)?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{QrEncoder, QrcodeEncoder};

    fn symbol(settings: &GeneratorSettings) -> EncodedSymbol {
        QrcodeEncoder
            .encode(&settings.payload, settings.ec_level)
            .unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ExportFormat::Png.file_name(), "qrcode.png");
        assert_eq!(ExportFormat::Jpg.file_name(), "qrcode.jpg");
        assert_eq!("JPEG".parse::<ExportFormat>().unwrap(), ExportFormat::Jpg);
        assert!("gif".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_png_keeps_size() {
        let settings = GeneratorSettings::default();
        let bytes = export_bytes(&symbol(&settings), &settings, ExportFormat::Png).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (settings.size, settings.size));
    }

    #[test]
    fn test_jpg_is_opaque_on_background() {
        let settings = GeneratorSettings {
            background: Rgb::new(250, 240, 200),
            ..GeneratorSettings::default()
        };
        let bytes = export_bytes(&symbol(&settings), &settings, ExportFormat::Jpg).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
        let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
        // centre of the light ring of the top-left finder
        let p = settings.size * 3 / 2 / 29;
        let px = img.get_pixel(p, p);
        assert!(px[0] > 230 && px[2] > 170);
    }

    #[test]
    fn test_svg_export() {
        let settings = GeneratorSettings::default();
        let bytes = export_bytes(&symbol(&settings), &settings, ExportFormat::Svg).unwrap();
        assert!(String::from_utf8(bytes).unwrap().starts_with("<svg"));
    }

    #[test]
    fn test_flatten_transparent() {
        let bmp = Bitmap::from_rgba(1, 1, vec![0, 0, 0, 0]).unwrap();
        assert_eq!(flatten(&bmp, Rgb::new(10, 20, 30)), vec![10, 20, 30]);
    }
}
