//! TUI rendering — orchestrates all panes.

pub mod summary;
pub mod user_cards;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use userboard_core::{source::UserSource, view::Rgb};

use crate::app::{App, Mode};

/// Height of the summary row (total panel and country chart).
const SUMMARY_HEIGHT: u16 = 9;

/// Cards per grid row for a given terminal width.
pub fn card_columns(width: u16) -> usize {
  match width {
    0..80 => 1,
    80..120 => 2,
    _ => 3,
  }
}

pub(crate) fn color(rgb: Rgb) -> Color { Color::Rgb(rgb.0, rgb.1, rgb.2) }

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: UserSource + 'static>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),              // header
      Constraint::Length(SUMMARY_HEIGHT), // summary panels
      Constraint::Length(3),              // search field
      Constraint::Min(0),                 // cards
      Constraint::Length(1),              // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  summary::draw(f, rows[1], app);
  draw_search(f, rows[2], app);
  user_cards::draw(f, rows[3], app);
  draw_status(f, rows[4], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " Dashboard",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("userboard  {date} "),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Search ───────────────────────────────────────────────────────────────────

fn draw_search<S: UserSource + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let active = app.mode == Mode::Search;
  let border = if active { Color::Yellow } else { Color::DarkGray };

  let block = Block::default()
    .title(" Search Users ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let text = match (active, app.search.is_empty()) {
    (true, _) => Line::from(vec![
      Span::raw(app.search.clone()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]),
    (false, true) => Line::from(Span::styled(
      "press / to search by name or email",
      Style::default().fg(Color::DarkGray),
    )),
    (false, false) => Line::from(app.search.clone()),
  };

  f.render_widget(Paragraph::new(text).block(block), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: UserSource + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.mode {
    Mode::Search => ("SEARCH", "Type to filter  Esc clear  Enter done"),
    Mode::Browse => (
      "BROWSE",
      "←↑↓→/hjkl move  Enter details  / search  a add  d remove  r reload  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::Gray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
