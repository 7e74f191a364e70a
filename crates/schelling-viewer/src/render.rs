//! Terminal rendering of the world grid.

use schelling_core::Cell;
use schelling_world::Grid;
use std::io::{self, Write};

const CLEAR: &str = "\x1b[H\x1b[2J";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Draws grid snapshots as colored glyph blocks
pub struct Renderer {
    cell_size: usize,
}

impl Renderer {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.max(1) as usize,
        }
    }

    fn glyph(cell: Cell) -> (&'static str, char) {
        match cell {
            Cell::Red => (RED, '#'),
            Cell::Blue => (BLUE, '#'),
            Cell::Empty => ("", '.'),
        }
    }

    /// Draw the current grid snapshot, replacing the previous frame.
    pub fn draw(&self, grid: &Grid, out: &mut impl Write) -> io::Result<()> {
        let mut frame = String::with_capacity(grid.len() * self.cell_size + grid.side());
        frame.push_str(CLEAR);

        for (pos, cell) in grid.iter() {
            let (color, glyph) = Self::glyph(cell);
            frame.push_str(color);
            for _ in 0..self.cell_size {
                frame.push(glyph);
            }
            if !color.is_empty() {
                frame.push_str(RESET);
            }
            if pos.col as usize == grid.side() - 1 {
                frame.push('\n');
            }
        }

        out.write_all(frame.as_bytes())?;
        out.flush()
    }
}
