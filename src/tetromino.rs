//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with their four rotation states, stored as 4x4
//! row-major occupancy masks. The table is static; pieces only carry a
//! shape and a rotation and look their mask up here.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Side length of every rotation mask
pub const MASK_SIZE: i32 = 4;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl Shape {
    /// All shapes, in table order
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
    ];

    /// Get the color for this tetromino
    pub fn color(self) -> Color {
        match self {
            Shape::I => Color::Cyan,
            Shape::O => Color::Yellow,
            Shape::T => Color::Magenta,
            Shape::S => Color::Green,
            Shape::Z => Color::Red,
            Shape::J => Color::Blue,
            Shape::L => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// Mask of this shape at the given rotation
    pub fn mask(self, rotation: Rotation) -> Mask {
        SHAPES[self as usize][rotation.index()]
    }
}

/// Rotation table, indexed by `Shape as usize` then rotation index.
///
/// Each nibble is one mask row, top row in the most significant nibble, so
/// the binary literals read like the piece looks.
const SHAPES: [[Mask; 4]; 7] = [
    // I
    [
        Mask(0b0000_1111_0000_0000),
        Mask(0b0010_0010_0010_0010),
        Mask(0b0000_0000_1111_0000),
        Mask(0b0100_0100_0100_0100),
    ],
    // O
    [
        Mask(0b0110_0110_0000_0000),
        Mask(0b0110_0110_0000_0000),
        Mask(0b0110_0110_0000_0000),
        Mask(0b0110_0110_0000_0000),
    ],
    // T
    [
        Mask(0b0100_1110_0000_0000),
        Mask(0b0100_0110_0100_0000),
        Mask(0b0000_1110_0100_0000),
        Mask(0b0100_1100_0100_0000),
    ],
    // S
    [
        Mask(0b0110_1100_0000_0000),
        Mask(0b0100_0110_0010_0000),
        Mask(0b0000_0110_1100_0000),
        Mask(0b1000_1100_0100_0000),
    ],
    // Z
    [
        Mask(0b1100_0110_0000_0000),
        Mask(0b0010_0110_0100_0000),
        Mask(0b0000_1100_0110_0000),
        Mask(0b0100_1100_1000_0000),
    ],
    // J
    [
        Mask(0b1000_1110_0000_0000),
        Mask(0b0110_0100_0100_0000),
        Mask(0b0000_1110_0010_0000),
        Mask(0b0100_0100_1100_0000),
    ],
    // L
    [
        Mask(0b0010_1110_0000_0000),
        Mask(0b0100_0100_0110_0000),
        Mask(0b0000_1110_1000_0000),
        Mask(0b1100_0100_0100_0000),
    ],
];

/// A 4x4 occupancy mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask(u16);

impl Mask {
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Whether the cell at (col, row) inside the mask is filled
    pub fn is_filled(self, col: i32, row: i32) -> bool {
        if !(0..MASK_SIZE).contains(&col) || !(0..MASK_SIZE).contains(&row) {
            return false;
        }
        let bit = 15 - (row * MASK_SIZE + col);
        self.0 & (1 << bit) != 0
    }

    /// Filled cells as (col, row) offsets, row-major
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (0..MASK_SIZE)
            .flat_map(|row| (0..MASK_SIZE).map(move |col| (col, row)))
            .filter(move |&(col, row)| self.is_filled(col, row))
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Rotation states, clockwise from spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}
