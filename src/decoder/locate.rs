//! Finding an upright symbol in a binarized image
//!
//! The symbol is taken to be the bounding box of all dark pixels, which holds
//! for renders, exports and screenshots with a light surround. The top-left
//! finder is checked for its 1:1:3:1:1 profile and gives the module pitch.

use crate::models::{BitMatrix, Version};

/// Pixel rectangle covering the symbol, quiet zone excluded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolRegion {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
    /// Estimated module pitch in pixels
    pub module_size: f32,
}

impl SymbolRegion {
    /// Modules per side suggested by the pitch, before snapping to a version
    pub fn estimated_dimension(&self) -> f32 {
        (self.width + self.height) as f32 / 2.0 / self.module_size
    }

    /// Valid symbol widths within two versions of the estimate, nearest first
    pub fn candidate_dimensions(&self) -> Vec<usize> {
        let estimate = self.estimated_dimension();
        let mut widths: Vec<usize> = (1..=40u8)
            .filter_map(Version::new)
            .map(|v| v.width())
            .filter(|&w| (w as f32 - estimate).abs() <= 8.0)
            .collect();
        widths.sort_by(|a, b| {
            let da = (*a as f32 - estimate).abs();
            let db = (*b as f32 - estimate).abs();
            da.total_cmp(&db)
        });
        widths
    }
}

fn dark_bounds(binary: &BitMatrix) -> Option<(usize, usize, usize, usize)> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for y in 0..binary.height() {
        let row = binary.row(y);
        let Some(first) = row.iter().position(|&b| b) else {
            continue;
        };
        let last = row.iter().rposition(|&b| b).unwrap_or(first);
        bounds = Some(match bounds {
            None => (first, y, last, y),
            Some((l, t, r, _)) => (l.min(first), t, r.max(last), y),
        });
    }
    bounds
}

/// Lengths of the first five alternating runs starting dark at `x`
fn runs_from(row: &[bool], x: usize) -> Option<[usize; 5]> {
    let mut runs = [0usize; 5];
    let mut idx = 0;
    let mut expect = true;
    for &bit in row.get(x..)? {
        if bit != expect {
            idx += 1;
            if idx == 5 {
                break;
            }
            expect = !expect;
        }
        runs[idx] += 1;
    }
    (runs[4] > 0).then_some(runs)
}

/// 1:1:3:1:1 within half a module per run
fn finder_profile(runs: &[usize; 5]) -> Option<f32> {
    let total: usize = runs.iter().sum();
    let unit = total as f32 / 7.0;
    const TOL: f32 = 0.5;
    let expected = [1.0, 1.0, 3.0, 1.0, 1.0];
    runs.iter()
        .zip(expected)
        .all(|(&len, want)| (len as f32 / unit - want).abs() <= TOL.max(want * TOL))
        .then_some(unit)
}

/// Locate the symbol and measure its module pitch.
pub fn locate(binary: &BitMatrix) -> Option<SymbolRegion> {
    let (left, top, right, bottom) = dark_bounds(binary)?;
    let width = right - left + 1;
    let height = bottom - top + 1;

    // The finder's top edge is one solid 7-module run.
    let top_run = binary.row(top)[left..].iter().take_while(|&&b| b).count();
    let centre_y = top + top_run / 2;
    if centre_y >= binary.height() {
        return None;
    }
    let runs = runs_from(binary.row(centre_y), left)?;
    let module_size = finder_profile(&runs)?;

    if (width as f32 - height as f32).abs() > 2.0 * module_size || width < 21 {
        log::debug!("dark region {width}x{height} is not a symbol");
        return None;
    }
    log::debug!("symbol at ({left}, {top}) {width}x{height}, module {module_size:.2}px");
    Some(SymbolRegion {
        left,
        top,
        width,
        height,
        module_size,
    })
}

/// Sample the module grid at `dimension` modules per side, reading each
/// module at its centre.
pub fn sample_grid(binary: &BitMatrix, region: &SymbolRegion, dimension: usize) -> BitMatrix {
    let pitch_x = region.width as f32 / dimension as f32;
    let pitch_y = region.height as f32 / dimension as f32;
    let (max_x, max_y) = (binary.width() - 1, binary.height() - 1);
    BitMatrix::from_fn(dimension, dimension, |col, row| {
        let x = region.left + ((col as f32 + 0.5) * pitch_x) as usize;
        let y = region.top + ((row as f32 + 0.5) * pitch_y) as usize;
        binary.get(x.min(max_x), y.min(max_y))
    })
}

/// Modules on the two timing lines that break the dark/light alternation
pub fn timing_errors(grid: &BitMatrix) -> usize {
    let n = grid.width();
    if n < 21 {
        return usize::MAX;
    }
    (8..n - 8)
        .map(|i| {
            let expected = i % 2 == 0;
            (grid.get(i, 6) != expected) as usize + (grid.get(6, i) != expected) as usize
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finder_profile() {
        assert_eq!(finder_profile(&[4, 4, 12, 4, 4]), Some(4.0));
        assert!(finder_profile(&[3, 4, 13, 4, 4]).is_some());
        assert_eq!(finder_profile(&[4, 4, 4, 4, 4]), None);
    }

    #[test]
    fn test_runs_from() {
        let row = [false, true, false, true, true, true, false, true, false];
        assert_eq!(runs_from(&row, 1), Some([1, 1, 3, 1, 1]));
        assert_eq!(runs_from(&row, 7), None);
    }

    #[test]
    fn test_blank_image() {
        assert_eq!(locate(&BitMatrix::new(50, 50)), None);
    }

    #[test]
    fn test_candidates_prefer_nearest() {
        let region = SymbolRegion {
            left: 0,
            top: 0,
            width: 290,
            height: 290,
            module_size: 10.0,
        };
        let dims = region.candidate_dimensions();
        assert_eq!(dims[0], 29);
        assert!(dims.contains(&25) && dims.contains(&33));
    }
}
