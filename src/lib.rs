//! Falling-block puzzle engine
//!
//! The engine keeps a fixed-size grid and one falling piece. Pieces move
//! under gravity and player input, lock when they can no longer fall, and
//! completed rows are cleared and reported to a [`ClearListener`].
//!
//! ```
//! use dropfield::{Action, Game, GameConfig, Outcome};
//! use std::time::Instant;
//!
//! let now = Instant::now();
//! let mut game = Game::new(&GameConfig::default(), now);
//! game.set_listener(|lines: u32| println!("cleared {lines}"));
//!
//! game.apply(Action::MoveLeft, now);
//! assert!(matches!(game.apply(Action::HardDrop, now), Outcome::Locked { .. }));
//! ```
//!
//! Rendering and input live in the binary: [`ui`] draws a [`Snapshot`] and
//! [`input`] maps keys to [`Action`]s.

pub mod board;
pub mod error;
pub mod game;
pub mod gravity;
pub mod input;
pub mod piece;
pub mod settings;
pub mod snapshot;
pub mod supply;
pub mod tetromino;
pub mod ui;

pub use board::{Board, Cell};
pub use error::SettingsError;
pub use game::{Action, ClearListener, Game, GameConfig, Outcome};
pub use piece::Piece;
pub use settings::Settings;
pub use snapshot::{ActiveSnapshot, Display, Snapshot};
pub use supply::{PieceSupply, RandomSupply, ScriptedSupply};
pub use tetromino::{Mask, Rotation, Shape};
