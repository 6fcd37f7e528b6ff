use crate::models::{BitMatrix, Version};

/// Centre coordinates of the alignment patterns along one axis
pub fn alignment_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let count = v / 7 + 2;
    let step = (v * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
    let mut positions = vec![6];
    let mut pos = version.width() - 7;
    loop {
        positions.insert(1, pos);
        if positions.len() == count {
            break;
        }
        pos -= step;
    }
    positions
}

/// Marks every module that is not part of the codeword area.
/// `true` = function module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.width();
        let mut mask = BitMatrix::square(size);
        let mut fill = |x0: usize, y0: usize, w: usize, h: usize| {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    mask.set(x, y, true);
                }
            }
        };

        // Finders with separators and format areas; bottom-left includes
        // the fixed dark module.
        fill(0, 0, 9, 9);
        fill(size - 8, 0, 8, 9);
        fill(0, size - 8, 9, 8);

        // Timing
        fill(6, 0, 1, size);
        fill(0, 6, size, 1);

        let align = alignment_positions(version);
        let last = align.len().saturating_sub(1);
        for (i, &cy) in align.iter().enumerate() {
            for (j, &cx) in align.iter().enumerate() {
                let on_finder =
                    (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !on_finder {
                    fill(cx - 2, cy - 2, 5, 5);
                }
            }
        }

        if version.number() >= 7 {
            fill(size - 11, 0, 3, 6);
            fill(0, size - 11, 6, 3);
        }

        Self { mask }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Whether (x, y) is a function module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of modules left for codewords
    pub fn data_module_count(&self) -> usize {
        self.size() * self.size() - self.mask.count_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::tables::raw_data_modules;

    const ALIGNMENT_TABLE: [&[usize]; 40] = [
        &[],
        &[6, 18],
        &[6, 22],
        &[6, 26],
        &[6, 30],
        &[6, 34],
        &[6, 22, 38],
        &[6, 24, 42],
        &[6, 26, 46],
        &[6, 28, 50],
        &[6, 30, 54],
        &[6, 32, 58],
        &[6, 34, 62],
        &[6, 26, 46, 66],
        &[6, 26, 48, 70],
        &[6, 26, 50, 74],
        &[6, 30, 54, 78],
        &[6, 30, 56, 82],
        &[6, 30, 58, 86],
        &[6, 34, 62, 90],
        &[6, 28, 50, 72, 94],
        &[6, 26, 50, 74, 98],
        &[6, 30, 54, 78, 102],
        &[6, 28, 54, 80, 106],
        &[6, 32, 58, 84, 110],
        &[6, 30, 58, 86, 114],
        &[6, 34, 62, 90, 118],
        &[6, 26, 50, 74, 98, 122],
        &[6, 30, 54, 78, 102, 126],
        &[6, 26, 52, 78, 104, 130],
        &[6, 30, 56, 82, 108, 134],
        &[6, 34, 60, 86, 112, 138],
        &[6, 30, 58, 86, 114, 142],
        &[6, 34, 62, 90, 118, 146],
        &[6, 30, 54, 78, 102, 126, 150],
        &[6, 24, 50, 76, 102, 128, 154],
        &[6, 28, 54, 80, 106, 132, 158],
        &[6, 32, 58, 84, 110, 136, 162],
        &[6, 26, 54, 82, 110, 138, 166],
        &[6, 30, 58, 86, 114, 142, 170],
    ];

    #[test]
    fn test_alignment_positions_every_version() {
        for (i, expected) in ALIGNMENT_TABLE.iter().enumerate() {
            let version = Version::new(i as u8 + 1).unwrap();
            assert_eq!(alignment_positions(version), *expected, "version {}", i + 1);
        }
    }

    #[test]
    fn test_data_modules_match_capacity_table() {
        for n in 1..=40u8 {
            let version = Version::new(n).unwrap();
            assert_eq!(
                FunctionMask::new(version).data_module_count(),
                raw_data_modules(version),
                "version {n}"
            );
        }
    }
}
