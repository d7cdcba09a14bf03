//! Game board representation and collision detection
//!
//! Coordinates are `(x, y)` with `x` the column and `y` the row, row 0 at the
//! top. Rows above the board (negative `y`) are open space for spawning.

use crate::tetromino::{Mask, Shape};
use serde::{Deserialize, Serialize};

/// Reference board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a locked piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Shape),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major, row 0 is the top row
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board. Dimensions are fixed for its lifetime.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "board needs at least one column and one row, got {width}x{height}"
        );
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Get the cell at (x, y). Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Whether (x, y) is blocked. Anything outside the board counts as
    /// occupied.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none_or(|cell| cell.is_filled())
    }

    /// Whether a mask anchored with its top-left at (x, y) fits.
    ///
    /// Cells left, right or below the board never fit. Cells above the top
    /// row are free so a piece can spawn and rotate partially hidden.
    pub fn try_fit(&self, mask: Mask, x: i32, y: i32) -> bool {
        mask.cells().all(|(dx, dy)| {
            let (Some(cx), Some(cy)) = (x.checked_add(dx), y.checked_add(dy)) else {
                return false;
            };
            if cx < 0 || cx >= self.width as i32 || cy >= self.height as i32 {
                return false;
            }
            cy < 0 || !self.is_occupied(cx, cy)
        })
    }

    /// Lock a mask onto the board.
    ///
    /// The caller must have checked `try_fit` for this placement with the
    /// anchor inside the board; the write is not re-validated.
    pub fn commit(&mut self, mask: Mask, x: i32, y: i32, shape: Shape) {
        debug_assert!(y >= 0, "commit above the board at y={y}");
        debug_assert!(self.try_fit(mask, x, y), "commit onto blocked cells");
        for (dx, dy) in mask.cells() {
            if let Some(i) = self.index(x + dx, y + dy) {
                self.cells[i] = Cell::Filled(shape);
            }
        }
    }

    /// Clear completed lines and return the number cleared.
    ///
    /// Surviving rows keep their order and sink to the bottom; the freed rows
    /// at the top are emptied.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let mut lines_cleared = 0;
        let mut write_row = self.height;

        for read_row in (0..self.height).rev() {
            if self.is_row_full(read_row) {
                lines_cleared += 1;
                continue;
            }
            // Keep this line
            write_row -= 1;
            if write_row != read_row {
                self.cells
                    .copy_within(read_row * width..(read_row + 1) * width, write_row * width);
            }
        }

        // Fill the top with empty rows
        self.cells[..write_row * width].fill(Cell::Empty);

        lines_cleared
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|cell| cell.is_filled())
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }
}
