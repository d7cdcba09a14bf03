//! DROPFIELD - falling blocks in the terminal

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dropfield::input::{Command, KeyBindings};
use dropfield::ui::{self, Stats};
use dropfield::{Game, Settings};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::cell::Cell;
use std::io::{self, Stdout, stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Longest wait for input before redrawing
const MAX_POLL: Duration = Duration::from_millis(250);

/// Get the dropfield temp directory, creating it if needed
fn temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("dropfield");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> anyhow::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file, the terminal belongs to the game
    let log_dir = temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dropfield=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "DROPFIELD starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    // First run: leave an editable copy of the defaults behind
    if Settings::settings_path().is_some_and(|path| !path.exists()) {
        match settings.save() {
            Ok(()) => tracing::info!("wrote default settings"),
            Err(e) => tracing::warn!("could not write default settings: {}", e),
        }
    }
    let config = settings
        .game_config()
        .context("invalid settings file")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, &settings, Game::new(&config, Instant::now()));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    let stats = result?;
    println!("\nThanks for playing DROPFIELD!");
    println!("Lines: {} | Board resets: {}", stats.lines, stats.resets);
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &Settings,
    mut game: Game,
) -> io::Result<Stats> {
    let keys = KeyBindings::from_settings(settings);

    // The listener is the only source of the counter; a zero count means
    // the board was wiped after a top-out.
    let lines = Rc::new(Cell::new(0u32));
    let resets = Rc::new(Cell::new(0u32));
    {
        let (lines, resets) = (Rc::clone(&lines), Rc::clone(&resets));
        game.set_listener(move |count: u32| {
            if count == 0 {
                lines.set(0);
                resets.set(resets.get() + 1);
            } else {
                lines.set(lines.get() + count);
            }
        });
    }
    let stats = || Stats {
        lines: lines.get(),
        resets: resets.get(),
    };

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game.snapshot(), stats(), &settings.visual))?;

        let now = Instant::now();
        let timeout = game
            .gravity_deadline()
            .map_or(MAX_POLL, |deadline| deadline.saturating_duration_since(now))
            .min(MAX_POLL);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match keys.command(key) {
                    Some(Command::Quit) => break,
                    Some(Command::Play(action)) => {
                        let outcome = game.apply(action, Instant::now());
                        tracing::trace!(?action, ?outcome, "input");
                    }
                    None => {}
                }
            }
        }

        game.update(Instant::now());
    }

    Ok(stats())
}
