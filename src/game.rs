//! Core game state and logic
//!
//! `Game` owns the board, the active piece and the gravity timer. Every
//! operation runs to completion and takes the caller's clock as `now`, so
//! the same engine serves the terminal loop and deterministic tests.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::gravity::{DEFAULT_INTERVAL, GravityTimer};
use crate::piece::{Piece, SPAWN_ROW};
use crate::snapshot::{ActiveSnapshot, Snapshot};
use crate::supply::{PieceSupply, RandomSupply};
use crate::tetromino::Shape;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
}

/// Result of one engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The move did not fit, or there was no piece; nothing changed
    Rejected,
    /// The active piece moved or rotated
    Moved,
    /// The piece was written into the board and `lines` rows were cleared
    Locked { lines: usize },
    /// The piece could not leave the spawn row; the board was wiped
    ToppedOut,
}

/// Observer for line clears.
///
/// Called with the number of rows removed when a lock clears at least one
/// row, and with 0 when a top-out wipes the board. Locks that clear nothing
/// are not reported.
pub trait ClearListener {
    fn lines_cleared(&mut self, count: u32);
}

impl<F: FnMut(u32)> ClearListener for F {
    fn lines_cleared(&mut self, count: u32) {
        self(count)
    }
}

/// Engine parameters, fixed for the lifetime of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Column of the mask's left edge for new pieces
    pub spawn_column: i32,
    pub gravity_interval: Duration,
    /// Whether successful sideways moves and rotations push back the next
    /// gravity drop
    pub reset_gravity_on_move: bool,
    pub seed: Option<u64>,
    pub avoid_repeat: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            spawn_column: default_spawn_column(BOARD_WIDTH),
            gravity_interval: DEFAULT_INTERVAL,
            reset_gravity_on_move: true,
            seed: None,
            avoid_repeat: true,
        }
    }
}

impl GameConfig {
    /// Build the random supply this config describes
    pub fn supply(&self) -> RandomSupply {
        let supply = match self.seed {
            Some(seed) => RandomSupply::with_seed(seed),
            None => RandomSupply::new(),
        };
        supply.avoid_repeat(self.avoid_repeat)
    }
}

/// Left edge of a 4-wide mask centered on a board of `width` columns
pub fn default_spawn_column(width: usize) -> i32 {
    width as i32 / 2 - 2
}

/// The main game struct
pub struct Game<S = RandomSupply> {
    board: Board,
    /// Current falling piece, None only while a lock is in progress
    current_piece: Option<Piece>,
    /// Shape that spawns after the next lock
    next_shape: Shape,
    supply: S,
    gravity: GravityTimer,
    spawn_column: i32,
    reset_gravity_on_move: bool,
    listener: Option<Box<dyn ClearListener>>,
}

impl Game<RandomSupply> {
    /// Create a new game using the config's random supply
    pub fn new(config: &GameConfig, now: Instant) -> Self {
        Self::with_supply(config, config.supply(), now)
    }
}

impl<S: PieceSupply> Game<S> {
    /// Create a new game drawing pieces from `supply`
    pub fn with_supply(config: &GameConfig, mut supply: S, now: Instant) -> Self {
        let first = supply.next_shape(None);
        let next_shape = supply.next_shape(None);

        let mut game = Self {
            board: Board::new(config.width, config.height),
            current_piece: None,
            next_shape,
            supply,
            gravity: GravityTimer::new(config.gravity_interval),
            spawn_column: config.spawn_column,
            reset_gravity_on_move: config.reset_gravity_on_move,
            listener: None,
        };
        game.spawn(first, now);
        game
    }

    /// Register the line-clear observer, replacing any previous one
    pub fn set_listener(&mut self, listener: impl ClearListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_shape(&self) -> Shape {
        self.next_shape
    }

    /// When gravity will next pull the piece down, if a piece is falling
    pub fn gravity_deadline(&self) -> Option<Instant> {
        self.gravity.deadline()
    }

    /// Anchor row the active piece would land on
    pub fn ghost_y(&self) -> Option<i32> {
        self.current_piece.map(|piece| piece.ghost_y(&self.board))
    }

    /// Put a new piece of `shape` at the spawn position.
    ///
    /// The spawn is not checked against the board; a blocked spawn shows up
    /// as a top-out on its first failed drop.
    pub fn spawn(&mut self, shape: Shape, now: Instant) {
        let piece = Piece::new(shape, self.spawn_column);
        debug!(?shape, x = piece.x, y = piece.y, "spawn");
        self.current_piece = Some(piece);
        self.gravity.restart(now);
    }

    /// Process an action
    pub fn apply(&mut self, action: Action, now: Instant) -> Outcome {
        match action {
            Action::MoveLeft => self.shift(-1, now),
            Action::MoveRight => self.shift(1, now),
            Action::Rotate => self.rotate(now),
            Action::SoftDrop => self.soft_drop(now),
            Action::HardDrop => self.hard_drop(now),
        }
    }

    /// Run gravity. Returns None if no drop was due.
    pub fn update(&mut self, now: Instant) -> Option<Outcome> {
        if self.gravity.take_due(now) {
            Some(self.soft_drop(now))
        } else {
            None
        }
    }

    /// Move the piece `dx` columns, all or nothing
    pub fn shift(&mut self, dx: i32, now: Instant) -> Outcome {
        self.try_replace(|piece| piece.shifted(dx, 0), now)
    }

    /// Rotate clockwise in place. There are no wall kicks.
    pub fn rotate(&mut self, now: Instant) -> Outcome {
        self.try_replace(|piece| Some(piece.rotated()), now)
    }

    fn try_replace(
        &mut self,
        candidate: impl FnOnce(&Piece) -> Option<Piece>,
        now: Instant,
    ) -> Outcome {
        let Some(moved) = self.current_piece.as_ref().and_then(candidate) else {
            return Outcome::Rejected;
        };
        if !moved.fits(&self.board) {
            return Outcome::Rejected;
        }
        self.current_piece = Some(moved);
        if self.reset_gravity_on_move {
            self.gravity.restart(now);
        }
        Outcome::Moved
    }

    /// Move down one row, or lock the piece if it cannot
    pub fn soft_drop(&mut self, now: Instant) -> Outcome {
        let Some(piece) = &self.current_piece else {
            return Outcome::Rejected;
        };
        let moved = piece.shifted(0, 1).filter(|moved| moved.fits(&self.board));
        if let Some(moved) = moved {
            self.current_piece = Some(moved);
            self.gravity.restart(now);
            Outcome::Moved
        } else {
            self.lock_piece(now)
        }
    }

    /// Drop to the ghost position and lock immediately
    pub fn hard_drop(&mut self, now: Instant) -> Outcome {
        let Some(piece) = &mut self.current_piece else {
            return Outcome::Rejected;
        };
        piece.y += piece.drop_distance(&self.board);
        self.lock_piece(now)
    }

    /// Lock the current piece and spawn next
    fn lock_piece(&mut self, now: Instant) -> Outcome {
        let Some(piece) = self.current_piece.take() else {
            return Outcome::Rejected;
        };
        self.gravity.cancel();

        let outcome = if piece.y == SPAWN_ROW {
            warn!(shape = ?piece.shape, "stack reached the spawn row, resetting board");
            self.notify(0);
            self.board.reset();
            Outcome::ToppedOut
        } else {
            self.board.commit(piece.mask(), piece.x, piece.y, piece.shape);
            debug!(shape = ?piece.shape, x = piece.x, y = piece.y, "lock");

            let lines = self.board.clear_full_rows();
            if lines > 0 {
                info!(lines, "cleared lines");
                self.notify(lines as u32);
            }
            Outcome::Locked { lines }
        };

        // Spawn next piece
        let shape = self.next_shape;
        self.next_shape = self.supply.next_shape(Some(shape));
        self.spawn(shape, now);

        outcome
    }

    fn notify(&mut self, count: u32) {
        if let Some(listener) = self.listener.as_mut() {
            listener.lines_cleared(count);
        }
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.board.width(),
            height: self.board.height(),
            cells: self.board.rows().flatten().copied().collect(),
            active: self.current_piece.map(|piece| ActiveSnapshot {
                piece,
                blocks: piece.block_positions(),
                ghost_y: piece.ghost_y(&self.board),
            }),
            next: self.next_shape,
        }
    }
}
