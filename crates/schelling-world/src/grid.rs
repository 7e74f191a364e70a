//! Square 2D grid for the world.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use schelling_core::{Cell, Position, Result, WorldConfig};
use serde::{Deserialize, Serialize};

/// A bounded square grid of actors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid with the given side length.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![Cell::Empty; side * side],
        }
    }

    /// Create a randomly populated grid from world configuration.
    ///
    /// The requested cell count is adjusted down to the nearest perfect
    /// square. Exactly the configured number of red and blue actors (see
    /// `WorldConfig::target_counts`) is laid out, then uniformly shuffled
    /// and reshaped row-major.
    pub fn from_config(config: &WorldConfig, rng: &mut ChaCha8Rng) -> Result<Grid> {
        config.validate()?;

        let side = config.side();
        let (reds, blues) = config.target_counts();

        let mut cells = vec![Cell::Empty; side * side];
        cells[..reds].fill(Cell::Red);
        cells[reds..reds + blues].fill(Cell::Blue);
        cells.shuffle(rng);

        Ok(Self { side, cells })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the position lies inside the grid bounds.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.side
            && (pos.col as usize) < self.side
    }

    /// Get the cell at a position. The position must be in bounds.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.pos_to_index(pos)]
    }

    /// Set the cell at a position. The position must be in bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.pos_to_index(pos);
        self.cells[index] = cell;
    }

    /// Exchange the contents of two cells.
    pub fn swap(&mut self, a: Position, b: Position) {
        let ia = self.pos_to_index(a);
        let ib = self.pos_to_index(b);
        self.cells.swap(ia, ib);
    }

    /// The in-bounds Moore neighborhood of a position: up to 8 cells.
    pub fn moore_neighbors(&self, pos: Position) -> Vec<(Position, Cell)> {
        let mut neighbors = Vec::with_capacity(8);

        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }

                let neighbor_pos = pos.offset(dr, dc);
                if self.contains(neighbor_pos) {
                    neighbors.push((neighbor_pos, self.get(neighbor_pos)));
                }
            }
        }

        neighbors
    }

    /// Fraction of same-colored actors among the occupied Moore neighbors.
    ///
    /// Returns `None` for empty cells. Empty neighbors and out-of-bounds
    /// offsets are excluded from the denominator; an actor with no occupied
    /// neighbors at all is vacuously similar, `Some(1.0)`.
    pub fn similarity(&self, pos: Position) -> Option<f64> {
        let cell = self.get(pos);
        if cell.is_empty() {
            return None;
        }

        let mut same = 0usize;
        let mut total = 0usize;
        for (_, neighbor) in self.moore_neighbors(pos) {
            if neighbor.is_empty() {
                continue;
            }
            total += 1;
            if neighbor == cell {
                same += 1;
            }
        }

        if total == 0 {
            Some(1.0)
        } else {
            Some(same as f64 / total as f64)
        }
    }

    /// Number of cells holding the given value.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Cell counts as (red, blue, empty).
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut red = 0;
        let mut blue = 0;
        let mut empty = 0;
        for cell in &self.cells {
            match cell {
                Cell::Red => red += 1,
                Cell::Blue => blue += 1,
                Cell::Empty => empty += 1,
            }
        }
        (red, blue, empty)
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos));
        pos.row as usize * self.side + pos.col as usize
    }

    /// Get position from row-major index.
    pub fn index_to_pos(&self, index: usize) -> Position {
        Position::new((index / self.side) as i32, (index % self.side) as i32)
    }

    /// Iterator over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), *cell))
    }
}
