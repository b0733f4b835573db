//! 2D occupancy grid used by every generation pass.

use rand::Rng;

use crate::error::MapGenError;

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty = 0,
    Floor = 1,
}

impl Cell {
    /// Numeric occupancy value (0 or 1).
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn is_floor(self) -> bool {
        matches!(self, Cell::Floor)
    }
}

impl From<bool> for Cell {
    fn from(occupied: bool) -> Self {
        if occupied { Cell::Floor } else { Cell::Empty }
    }
}

/// A rectangular 2D grid stored row-major. Unlike a world map it does not
/// wrap: coordinates outside `[0, width) x [0, height)` are simply absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    /// Create a `width` x `height` grid with every cell set to `value`.
    pub fn new_with(width: usize, height: usize, value: T) -> Result<Self, MapGenError> {
        if width == 0 || height == 0 {
            return Err(MapGenError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether a signed coordinate lies inside the grid.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> MapGenError {
        MapGenError::OutOfBounds { x, y, width: self.width, height: self.height }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T, MapGenError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x as i64, y as i64));
        }
        Ok(&self.data[self.index(x, y)])
    }

    /// Look up a signed coordinate, `None` when it falls outside the grid.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<&T> {
        if self.contains(x, y) {
            Some(&self.data[self.index(x as usize, y as usize)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<(), MapGenError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x as i64, y as i64));
        }
        let idx = self.index(x, y);
        self.data[idx] = value;
        Ok(())
    }

    /// Set a signed coordinate, skipping it silently when out of bounds.
    /// Returns whether the cell was written.
    pub fn set_clipped(&mut self, x: i64, y: i64, value: T) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.index(x as usize, y as usize);
        self.data[idx] = value;
        true
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| (idx % width, idx / width, val))
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.width)
    }
}

impl<T: Clone + PartialEq> Tilemap<T> {
    /// Number of cells equal to `value`.
    pub fn count(&self, value: &T) -> usize {
        self.data.iter().filter(|v| *v == value).count()
    }
}

impl Tilemap<Cell> {
    /// Seed grid where each cell is independently Floor with probability `density`.
    pub fn random_fill<R: Rng>(
        width: usize,
        height: usize,
        density: f64,
        rng: &mut R,
    ) -> Result<Self, MapGenError> {
        let mut map = Self::new_with(width, height, Cell::Empty)?;
        if density > 0.0 {
            for cell in map.data.iter_mut() {
                *cell = Cell::from(rng.gen::<f64>() < density);
            }
        }
        Ok(map)
    }

    pub fn floor_count(&self) -> usize {
        self.count(&Cell::Floor)
    }

    /// Fraction of cells that are Floor.
    pub fn floor_ratio(&self) -> f64 {
        self.floor_count() as f64 / (self.width * self.height) as f64
    }
}
