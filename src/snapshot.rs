//! Read-only game view for renderers

use crate::board::Cell;
use crate::piece::Piece;
use crate::tetromino::Shape;
use serde::Serialize;

/// Active piece as a renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub piece: Piece,
    /// Absolute (x, y) of the four blocks, may include rows above the board
    pub blocks: [(i32, i32); 4],
    /// Anchor row of the lowest legal resting position
    pub ghost_y: i32,
}

impl ActiveSnapshot {
    /// Blocks of the ghost piece
    pub fn ghost_blocks(&self) -> [(i32, i32); 4] {
        let dy = self.ghost_y - self.piece.y;
        self.blocks.map(|(x, y)| (x, y + dy))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Locked cells, row-major from the top row
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub next: Shape,
}

impl Snapshot {
    /// Locked cell at (x, y); out of range reads as empty
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x >= self.width || y >= self.height {
            return Cell::Empty;
        }
        self.cells[y * self.width + x]
    }

    /// What to draw at (x, y), active piece over ghost over locked cells
    pub fn display(&self, x: usize, y: usize) -> Display {
        let pos = (x as i32, y as i32);
        if let Some(active) = &self.active {
            if active.blocks.contains(&pos) {
                return Display::Active(active.piece.shape);
            }
            if active.ghost_blocks().contains(&pos) {
                return Display::Ghost(active.piece.shape);
            }
        }
        match self.cell(x, y) {
            Cell::Filled(shape) => Display::Locked(shape),
            Cell::Empty => Display::Empty,
        }
    }
}

/// One cell of the rendered playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Empty,
    Locked(Shape),
    Active(Shape),
    Ghost(Shape),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn test_display_layers() {
        let board = Board::default();
        let piece = Piece::new(Shape::O, 3);
        let mut cells: Vec<Cell> = board.rows().flatten().copied().collect();
        cells[19 * 10] = Cell::Filled(Shape::Z);
        let snap = Snapshot {
            width: 10,
            height: 20,
            cells,
            active: Some(ActiveSnapshot {
                piece,
                blocks: piece.block_positions(),
                ghost_y: piece.ghost_y(&board),
            }),
            next: Shape::I,
        };
        assert_eq!(snap.display(4, 0), Display::Active(Shape::O));
        assert_eq!(snap.display(4, 19), Display::Ghost(Shape::O));
        assert_eq!(snap.display(0, 19), Display::Locked(Shape::Z));
        assert_eq!(snap.display(0, 0), Display::Empty);
        assert_eq!(snap.cell(10, 0), Cell::Empty);
    }
}
