//! Rasterising and vectorising encoded symbols.
//!
//! Both renderers draw the bare module grid, without a quiet zone, stretched
//! to exactly `size` pixels. Module edges fall on fractional pixels when
//! `size` is not a multiple of the module count; each pixel takes the colour
//! of the module its top-left corner lies in.

use super::EncodedSymbol;
use crate::error::{QrError, Result};
use crate::models::{Bitmap, Rgb};
use std::fmt::Write;

/// Rasterise `symbol` into a `size`-square bitmap.
pub fn render_bitmap(symbol: &EncodedSymbol, size: u32, fg: Rgb, bg: Rgb) -> Result<Bitmap> {
    if size == 0 {
        return Err(QrError::InvalidSize(size));
    }
    let side = size as usize;
    let n = symbol.width();
    let mut bitmap = Bitmap::filled(side, side, bg);
    let dark = fg.to_rgba();

    // Precompute pixel -> module once per axis.
    let to_module: Vec<usize> = (0..side).map(|p| p * n / side).collect();
    for (y, &row) in to_module.iter().enumerate() {
        for (x, &col) in to_module.iter().enumerate() {
            if symbol.is_dark(col, row) {
                bitmap.put(x, y, dark);
            }
        }
    }
    Ok(bitmap)
}

/// Serialise `symbol` as standalone SVG markup, `size` pixels square.
///
/// One unit of the view box is one module; dark modules are merged into a
/// single path of horizontal runs.
pub fn render_svg(symbol: &EncodedSymbol, size: u32, fg: Rgb, bg: Rgb) -> String {
    let n = symbol.width();
    let mut path = String::new();
    for row in 0..n {
        let mut col = 0;
        while col < n {
            if !symbol.is_dark(col, row) {
                col += 1;
                continue;
            }
            let start = col;
            while col < n && symbol.is_dark(col, row) {
                col += 1;
            }
            // Writing into a String cannot fail.
            let _ = write!(path, "M{start} {row}h{}v1H{start}z", col - start);
        }
    }

    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" "#,
            r#"viewBox="0 0 {n} {n}" shape-rendering="crispEdges">"#,
            r#"<path fill="{bg}" d="M0,0 h{n}v{n}H0z"/>"#,
            r#"<path fill="{fg}" d="{path}"/>"#,
            "</svg>"
        ),
        size = size,
        n = n,
        bg = bg.to_hex(),
        fg = fg.to_hex(),
        path = path,
    )
}
