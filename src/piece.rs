//! Active falling piece logic
//!
//! A `Piece` is a plain value. Every move builds a candidate and only
//! replaces the current piece when the board accepts it, so a rejected move
//! never leaves partial state behind.

use crate::board::Board;
use crate::tetromino::{Mask, Rotation, Shape};
use serde::{Deserialize, Serialize};

/// Row every piece spawns on, one above the visible board
pub const SPAWN_ROW: i32 = -1;

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// The type of tetromino
    pub shape: Shape,
    /// Current rotation state
    pub rotation: Rotation,
    /// Column of the mask's top-left corner
    pub x: i32,
    /// Row of the mask's top-left corner, row 0 is the top
    pub y: i32,
}

impl Piece {
    /// Create a new piece at the spawn row
    pub fn new(shape: Shape, column: i32) -> Self {
        Self {
            shape,
            rotation: Rotation::North,
            x: column,
            y: SPAWN_ROW,
        }
    }

    pub fn mask(&self) -> Mask {
        self.shape.mask(self.rotation)
    }

    /// Absolute (x, y) positions of all 4 blocks
    pub fn block_positions(&self) -> [(i32, i32); 4] {
        let mut out = [(0, 0); 4];
        for (slot, (dx, dy)) in out.iter_mut().zip(self.mask().cells()) {
            *slot = (self.x + dx, self.y + dy);
        }
        out
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.try_fit(self.mask(), self.x, self.y)
    }

    /// Same piece moved by (dx, dy), or None if the anchor would overflow
    pub fn shifted(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            ..*self
        })
    }

    /// Same piece turned clockwise about the same anchor
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.cw(),
            ..*self
        }
    }

    /// How many rows this piece can fall before it rests
    pub fn drop_distance(&self, board: &Board) -> i32 {
        let mut distance = 0;
        while self
            .shifted(0, distance + 1)
            .is_some_and(|piece| piece.fits(board))
        {
            distance += 1;
        }
        distance
    }

    /// Get the ghost piece row (where the piece would land)
    pub fn ghost_y(&self, board: &Board) -> i32 {
        self.y + self.drop_distance(board)
    }
}
