//! Terminal UI rendering with ratatui
//!
//! Draws a `Snapshot`; nothing here touches the engine.

use crate::settings::VisualSettings;
use crate::snapshot::{Display, Snapshot};
use crate::tetromino::{MASK_SIZE, Rotation, Shape};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const EMPTY: &str = "  ";

/// Width of the side panel with the next piece and counter
const PANEL_WIDTH: u16 = 16;

/// What the side panel shows besides the next piece
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub lines: u32,
    pub resets: u32,
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, stats: Stats, visual: &VisualSettings) {
    let board_width = snapshot.width as u16 * 2 + 2;
    let board_height = snapshot.height as u16 + 2;

    // Center the game area
    let game_area = center_rect(frame.area(), board_width + PANEL_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(PANEL_WIDTH)])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, visual);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], snapshot.next, visual);
    render_stats(frame, right_layout[1], stats);
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, visual: &VisualSettings) {
    let (block_char, ghost_char) = visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = (0..snapshot.height)
        .map(|y| {
            let spans: Vec<Span> = (0..snapshot.width)
                .map(|x| match snapshot.display(x, y) {
                    Display::Active(shape) | Display::Locked(shape) => {
                        Span::styled(block_char, Style::default().fg(shape.color()))
                    }
                    Display::Ghost(shape) if visual.show_ghost => {
                        Span::styled(ghost_char, Style::default().fg(shape.color()).dim())
                    }
                    Display::Ghost(_) | Display::Empty => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, shape: Shape, visual: &VisualSettings) {
    let (block_char, _) = visual.block_chars();
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mask = shape.mask(Rotation::North);
    let style = Style::default().fg(shape.color());
    let lines: Vec<Line> = (0..MASK_SIZE)
        .filter(|&row| (0..MASK_SIZE).any(|col| mask.is_filled(col, row)))
        .map(|row| {
            let spans: Vec<Span> = (0..MASK_SIZE)
                .map(|col| {
                    if mask.is_filled(col, row) {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, stats: Stats) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::styled("LINES", Style::default().fg(Color::Gray)),
        Line::styled(stats.lines.to_string(), Style::default().fg(Color::Cyan).bold()),
        Line::styled("RESETS", Style::default().fg(Color::Gray)),
        Line::styled(stats.resets.to_string(), Style::default().fg(Color::Red)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
