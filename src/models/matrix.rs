/// Row-major boolean matrix.
///
/// Used both for binarized images (true = dark pixel) and for QR module
/// grids (true = dark module). Coordinates are `(x, y)` = `(col, row)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    /// Create an all-light matrix
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    /// Create an all-light square matrix, `size` modules per side
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a matrix by evaluating `f(x, y)` for every position
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self { width, height, bits }
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-bounds reads are light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y * self.width + x]
    }

    /// Set bit at (x, y); out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = value;
        }
    }

    /// Invert bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.bits[idx] = !self.bits[idx];
        }
    }

    /// Number of set (dark) bits
    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// One row as a slice
    pub fn row(&self, y: usize) -> &[bool] {
        let start = y * self.width;
        &self.bits[start..start + self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(8, 6);
        assert_eq!(matrix.width(), 8);
        assert_eq!(matrix.height(), 6);

        matrix.set(3, 4, true);
        assert!(matrix.get(3, 4));
        assert!(!matrix.get(4, 3));

        matrix.toggle(3, 4);
        assert!(!matrix.get(3, 4));
        assert_eq!(matrix.count_set(), 0);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let matrix = BitMatrix::from_fn(3, 2, |x, y| x == 2 && y == 1);
        assert_eq!(matrix.row(1), &[false, false, true]);
        assert_eq!(matrix.count_set(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::square(8);
        matrix.set(10, 10, true);
        matrix.toggle(10, 10);
        assert!(!matrix.get(10, 10));
    }
}
