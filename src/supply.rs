//! Piece supply policy
//!
//! Draws are uniform over the 7 shapes. To break up streaks, a draw that
//! matches the previous "next" piece is redrawn once; the second draw is
//! kept whatever it is.

use crate::tetromino::Shape;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of upcoming pieces
pub trait PieceSupply {
    /// Choose the next shape. `previous` is the shape that was queued as
    /// "next" before this draw, if any.
    fn next_shape(&mut self, previous: Option<Shape>) -> Shape;
}

/// Draw once, and once more if the first draw repeats `previous`
pub fn draw_avoiding_repeat(previous: Option<Shape>, mut draw: impl FnMut() -> Shape) -> Shape {
    let choice = draw();
    if Some(choice) == previous {
        return draw();
    }
    choice
}

/// Uniform random supply with the one-redraw repeat rule
#[derive(Debug, Clone)]
pub struct RandomSupply {
    rng: ChaCha8Rng,
    avoid_repeat: bool,
}

impl RandomSupply {
    /// Create a supply seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Create a reproducible supply
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            avoid_repeat: true,
        }
    }

    /// Turn the repeat rule on or off
    pub fn avoid_repeat(mut self, enabled: bool) -> Self {
        self.avoid_repeat = enabled;
        self
    }

    fn draw(&mut self) -> Shape {
        Shape::ALL[self.rng.gen_range(0..Shape::ALL.len())]
    }
}

impl Default for RandomSupply {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSupply for RandomSupply {
    fn next_shape(&mut self, previous: Option<Shape>) -> Shape {
        if !self.avoid_repeat {
            return self.draw();
        }
        draw_avoiding_repeat(previous, || self.draw())
    }
}

/// Supply that replays a fixed sequence, cycling when exhausted.
///
/// Handy for tests and demos that need a known piece order.
#[derive(Debug, Clone)]
pub struct ScriptedSupply {
    shapes: Vec<Shape>,
    cursor: usize,
}

impl ScriptedSupply {
    /// # Panics
    ///
    /// Panics if `shapes` is empty.
    pub fn new(shapes: impl Into<Vec<Shape>>) -> Self {
        let shapes = shapes.into();
        assert!(!shapes.is_empty(), "scripted supply needs at least one shape");
        Self { shapes, cursor: 0 }
    }
}

impl PieceSupply for ScriptedSupply {
    fn next_shape(&mut self, _previous: Option<Shape>) -> Shape {
        let shape = self.shapes[self.cursor % self.shapes.len()];
        self.cursor += 1;
        shape
    }
}
