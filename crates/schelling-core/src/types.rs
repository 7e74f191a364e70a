//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};

/// Occupant of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Red,
    Blue,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Per-cell satisfaction state, derived from the grid anew each generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Satisfaction {
    Satisfied,
    Unsatisfied,
    /// Empty cells have no satisfaction of their own
    NotApplicable,
}

/// 2D position in the world grid
///
/// Coordinates are signed so neighbor offsets may step outside the grid;
/// `Grid::contains` decides validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}
