//! End-to-end scenarios against the public engine API.

use dropfield::{
    Action, Board, Cell, Game, GameConfig, Mask, Outcome, Rotation, ScriptedSupply, Settings,
    Shape,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const DOMINO: Mask = Mask::from_bits(0b1100_0000_0000_0000);

fn game_with(shapes: &[Shape], config: &GameConfig) -> (Game<ScriptedSupply>, Instant) {
    let now = Instant::now();
    (Game::with_supply(config, ScriptedSupply::new(shapes), now), now)
}

fn drop_until_locked<S: dropfield::PieceSupply>(game: &mut Game<S>, now: Instant) -> Outcome {
    loop {
        match game.soft_drop(now) {
            Outcome::Moved => continue,
            other => return other,
        }
    }
}

#[test]
fn horizontal_i_completes_a_row() {
    let mut board = Board::new(10, 20);
    let i = Shape::I.mask(Rotation::North);
    // Prepare columns 4..10 of the bottom row
    board.commit(i, 4, 18, Shape::I);
    board.commit(DOMINO, 8, 19, Shape::O);
    assert_eq!(board.clear_full_rows(), 0);

    board.commit(i, 0, 18, Shape::I);
    assert_eq!(board.clear_full_rows(), 1);
    assert!(board.row(19).iter().all(Cell::is_empty));
    assert!(board.is_empty());
}

#[test]
fn far_move_from_spawn_is_rejected() {
    let config = GameConfig {
        spawn_column: 4,
        ..GameConfig::default()
    };
    let (mut game, now) = game_with(&[Shape::T], &config);
    let before = *game.current_piece().unwrap();
    assert_eq!((before.x, before.y), (4, -1));

    assert_eq!(game.shift(-10, now), Outcome::Rejected);
    assert_eq!(*game.current_piece().unwrap(), before);
}

#[test]
fn hard_drop_lands_on_ghost() {
    let (mut game, now) = game_with(&[Shape::S, Shape::Z], &GameConfig::default());
    game.rotate(now);
    game.shift(2, now);
    let piece = *game.current_piece().unwrap();
    let ghost_y = game.ghost_y().unwrap();

    assert_eq!(game.hard_drop(now), Outcome::Locked { lines: 0 });
    let landed = dropfield::Piece { y: ghost_y, ..piece };
    for (x, y) in landed.block_positions() {
        assert_eq!(game.board().get(x, y), Some(Cell::Filled(Shape::S)));
    }
}

#[test]
fn hard_drop_matches_repeated_soft_drop() {
    let shapes = [Shape::J, Shape::I, Shape::T, Shape::L, Shape::O];
    let (mut hard, now) = game_with(&shapes, &GameConfig::default());
    let (mut soft, _) = game_with(&shapes, &GameConfig::default());

    for (i, _) in shapes.iter().enumerate() {
        let dx = i as i32 * 2 - 4;
        for game in [&mut hard, &mut soft] {
            game.rotate(now);
            game.shift(dx, now);
        }
        let a = hard.hard_drop(now);
        let b = drop_until_locked(&mut soft, now);
        assert_eq!(a, b);
        assert_eq!(hard.board(), soft.board());
    }
}

#[test]
fn gravity_drives_piece_to_lock() {
    let config = GameConfig {
        gravity_interval: Duration::from_millis(10),
        ..GameConfig::default()
    };
    let (mut game, start) = game_with(&[Shape::O, Shape::I], &config);

    let mut now = start;
    let mut outcome = None;
    for _ in 0..100 {
        now += Duration::from_millis(10);
        if let Some(Outcome::Locked { lines }) = game.update(now) {
            outcome = Some(lines);
            break;
        }
    }
    assert_eq!(outcome, Some(0));
    assert_eq!(game.board().get(4, 19), Some(Cell::Filled(Shape::O)));
    // The next piece is falling with a fresh deadline
    assert_eq!(game.current_piece().unwrap().shape, Shape::I);
    assert_eq!(game.gravity_deadline(), Some(now + Duration::from_millis(10)));
}

#[test]
fn listener_sees_clears_and_reset() {
    let config = Settings::default().game_config().unwrap();
    let (mut game, now) = game_with(&[Shape::I, Shape::I, Shape::O, Shape::O], &config);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    game.set_listener(move |count: u32| sink.borrow_mut().push(count));

    // Bottom row: I I O
    game.shift(-3, now);
    game.apply(Action::HardDrop, now);
    game.shift(1, now);
    game.apply(Action::HardDrop, now);
    game.shift(4, now);
    game.apply(Action::HardDrop, now);
    assert_eq!(*events.borrow(), vec![1]);

    // Pile O pieces in the spawn column until the stack tops out
    let mut outcome = Outcome::Rejected;
    for _ in 0..30 {
        outcome = game.apply(Action::HardDrop, now);
        if outcome == Outcome::ToppedOut {
            break;
        }
    }
    assert_eq!(outcome, Outcome::ToppedOut);
    assert_eq!(events.borrow().last(), Some(&0));
    assert!(game.board().is_empty());
}

#[test]
fn seeded_games_are_reproducible() {
    let config = GameConfig {
        seed: Some(2024),
        ..GameConfig::default()
    };
    let now = Instant::now();
    let mut a = Game::new(&config, now);
    let mut b = Game::new(&config, now);
    for _ in 0..40 {
        assert_eq!(a.current_piece(), b.current_piece());
        assert_eq!(a.next_shape(), b.next_shape());
        assert_eq!(a.hard_drop(now), b.hard_drop(now));
    }
    assert_eq!(a.snapshot(), b.snapshot());
}
