use super::Point;

/// One module position in a QR grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Column index in `[0, grid_size)`
    pub col: usize,
    /// Row index in `[0, grid_size)`
    pub row: usize,
    /// Whether the module is dark
    pub dark: bool,
}

/// An animated square standing in for one dark module during the reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Row-major index, `row * grid_size + col`
    pub id: usize,
    /// Column of the module this particle represents
    pub col: usize,
    /// Row of the module this particle represents
    pub row: usize,
    /// Final pixel position (top-left corner)
    pub position: Point,
    /// Edge length in pixels
    pub size: f32,
    /// Seconds to wait before this particle starts moving
    pub delay: f32,
}

/// The full particle set sampled from one render.
///
/// Replaced wholesale whenever the payload changes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleField {
    /// Particles in row-major scan order
    pub particles: Vec<Particle>,
    /// Pixel edge of one module (`display_size / grid_size`)
    pub module_size: f32,
    /// Modules per side the bitmap was sampled with
    pub grid_size: usize,
}

impl ParticleField {
    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when no dark module was found
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Look up the particle for a module, if that module was dark
    pub fn at(&self, col: usize, row: usize) -> Option<&Particle> {
        if col >= self.grid_size || row >= self.grid_size {
            return None;
        }
        let id = row * self.grid_size + col;
        self.particles
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.particles[i])
    }

    /// Every cell of the grid with its dark flag
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.grid_size;
        (0..n * n).map(move |id| Cell {
            col: id % n,
            row: id / n,
            dark: self.at(id % n, id / n).is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(col: usize, row: usize, grid_size: usize) -> Particle {
        Particle {
            id: row * grid_size + col,
            col,
            row,
            position: Point::new(col as f32, row as f32),
            size: 1.0,
            delay: 0.0,
        }
    }

    #[test]
    fn test_at_stays_inside_the_grid() {
        let field = ParticleField {
            particles: vec![particle(0, 1, 3), particle(2, 2, 3)],
            module_size: 1.0,
            grid_size: 3,
        };
        assert_eq!(field.at(0, 1).map(|p| p.id), Some(3));
        // (3, 0) would alias (0, 1) without the bounds check
        assert!(field.at(3, 0).is_none());
        assert!(field.at(0, 3).is_none());
        assert!(field.at(1, 1).is_none());
    }

    #[test]
    fn test_cells_cover_the_grid() {
        let field = ParticleField {
            particles: vec![particle(2, 2, 3)],
            module_size: 1.0,
            grid_size: 3,
        };
        let dark: Vec<Cell> = field.cells().filter(|c| c.dark).collect();
        assert_eq!(field.cells().count(), 9);
        assert_eq!(dark, vec![Cell { col: 2, row: 2, dark: true }]);
    }
}
