use crate::error::Error;
use rand::Rng;

/// Gap kept between the outermost reachable boundary and the field edge
const EDGE_MARGIN: f64 = 2.0;

/// Integer lattice coordinate. Coordinates may be negative or past the
/// field edge while a particle is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// The 8 unit moves of the lattice (axis and diagonal neighbours)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Unit offset for this move. Diagonals are not normalized, so a
    /// diagonal step covers a Euclidean distance of sqrt(2).
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::North => (0, 1),
            Direction::NorthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::South => (0, -1),
            Direction::SouthEast => (1, -1),
        }
    }

    /// Pick one of the 8 moves uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Square occupancy field plus the circular growth boundary around its center.
///
/// Occupancy is monotonic and the radius never shrinks; the only mutators are
/// [`Grid::occupy`] and [`Grid::grow_boundary_if_needed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
    center: Position,
    radius: f64,
    max_radius: f64,
}

impl Grid {
    /// Create a grid whose boundary has room to grow.
    ///
    /// Fails when `size` is zero or when `initial_radius` already meets the
    /// maximum radius for this size.
    pub fn new(size: usize, initial_radius: f64) -> Result<Self, Error> {
        let grid = Self::seed_only(size, initial_radius)?;
        if initial_radius >= grid.max_radius {
            return Err(Error::BoundaryTooSmall {
                size,
                initial_radius,
                max_radius: grid.max_radius,
            });
        }
        Ok(grid)
    }

    /// Create a grid holding only the seed cell, without checking that the
    /// boundary can grow.
    ///
    /// Fails when `size` is zero, when the center does not fit an `i32`
    /// coordinate, or when the cell count overflows `usize`.
    pub fn seed_only(size: usize, initial_radius: f64) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidSize { size });
        }
        let half = i32::try_from(size / 2).map_err(|_| Error::InvalidSize { size })?;
        let cell_count = size
            .checked_mul(size)
            .ok_or(Error::InvalidSize { size })?;

        let mut grid = Self {
            size,
            cells: vec![false; cell_count],
            center: Position::new(half, half),
            radius: initial_radius,
            max_radius: Self::max_radius_for(size),
        };
        let center = grid.center;
        grid.occupy(center);
        Ok(grid)
    }

    /// `min(width, height) / 2 - 2` for a square field
    pub fn max_radius_for(size: usize) -> f64 {
        size as f64 / 2.0 - EDGE_MARGIN
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn center(&self) -> Position {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Check whether `pos` lies inside the field
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.size + pos.x as usize)
        } else {
            None
        }
    }

    /// Off-grid positions read as unoccupied
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx])
    }

    /// True if any of the 8 lattice neighbours of `pos` is occupied
    pub fn has_occupied_neighbor(&self, pos: Position) -> bool {
        Direction::ALL.iter().any(|dir| {
            let (dx, dy) = dir.offset();
            self.is_occupied(pos.offset(dx, dy))
        })
    }

    /// Mark a cell permanently occupied.
    /// Returns true if the cell was empty before; off-grid positions are ignored.
    pub fn occupy(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) if !self.cells[idx] => {
                self.cells[idx] = true;
                true
            }
            _ => false,
        }
    }

    pub fn distance_from_center(&self, pos: Position) -> f64 {
        let dx = (pos.x - self.center.x) as f64;
        let dy = (pos.y - self.center.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Push the boundary out to `pos` if it lies beyond the current radius.
    /// Returns true if the radius grew.
    pub fn grow_boundary_if_needed(&mut self, pos: Position) -> bool {
        let distance = self.distance_from_center(pos);
        if distance > self.radius {
            self.radius = distance;
            true
        } else {
            false
        }
    }

    /// True once the boundary has reached the edge of the usable field.
    /// The final stick can carry the radius up to sqrt(2) past `max_radius()`.
    pub fn is_saturated(&self) -> bool {
        self.radius >= self.max_radius
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Occupied positions in row-major order
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(move |(idx, _)| Position::new((idx % size) as i32, (idx / size) as i32))
    }

    /// Row-major copy of the occupancy field (`rows()[y][x]`)
    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}
