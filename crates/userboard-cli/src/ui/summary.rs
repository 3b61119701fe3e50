//! Summary row — total users and the users-by-country chart.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use userboard_core::{source::UserSource, store::LoadState, view::ChartSlice};

use super::color;
use crate::app::App;

/// Render both summary panels into `area`.
pub fn draw<S: UserSource + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
    .split(area);

  draw_total(f, cols[0], app);
  draw_countries(f, cols[1], app.slices());
}

fn panel(title: &str) -> Block<'_> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

// ─── Total ────────────────────────────────────────────────────────────────────

fn draw_total<S: UserSource + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let mut lines = vec![Line::from(Span::styled(
    app.store.len().to_string(),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  ))];

  let state = match app.store.load_state() {
    LoadState::NotLoaded => None,
    LoadState::Loading => Some(("loading…".to_string(), Color::Yellow)),
    LoadState::Loaded => None,
    LoadState::Failed(_) => Some(("last load failed".to_string(), Color::Red)),
  };
  if let Some((text, fg)) = state {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(text, Style::default().fg(fg))));
  }

  f.render_widget(Paragraph::new(lines).block(panel("Total Users")), area);
}

// ─── Country chart ────────────────────────────────────────────────────────────

fn draw_countries(f: &mut Frame, area: Rect, slices: &[ChartSlice]) {
  let block = panel("Users by Country");
  let inner = block.inner(area);
  f.render_widget(block, area);

  if slices.is_empty() {
    f.render_widget(
      Paragraph::new("No data").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let mut lines = vec![strip(slices, inner.width as usize), Line::from("")];

  // Legend, with an overflow line when the panel is too short.
  let room = (inner.height as usize).saturating_sub(lines.len());
  let shown = if slices.len() > room {
    room.saturating_sub(1)
  } else {
    slices.len()
  };
  for slice in &slices[..shown] {
    lines.push(Line::from(vec![
      Span::styled("■ ", Style::default().fg(color(slice.color))),
      Span::raw(format!(
        "{}  {}  {:.1}%",
        slice.label,
        slice.value,
        slice.share * 100.0
      )),
    ]));
  }
  if shown < slices.len() {
    lines.push(Line::from(Span::styled(
      format!("+{} more", slices.len() - shown),
      Style::default().fg(Color::DarkGray),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

/// A one-row proportional bar: each country gets a run of cells in its
/// colour, sized by its share of the total.
fn strip(slices: &[ChartSlice], width: usize) -> Line<'static> {
  let mut spans = Vec::with_capacity(slices.len());
  let mut cumulative = 0.0;
  let mut drawn = 0;
  for slice in slices {
    cumulative += slice.share;
    let end = ((cumulative * width as f64).round() as usize).min(width);
    let cells = end.saturating_sub(drawn);
    drawn = end;
    if cells > 0 {
      spans.push(Span::styled(
        "█".repeat(cells),
        Style::default().fg(color(slice.color)),
      ));
    }
  }
  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use userboard_core::view::{Rgb, palette_color};

  use super::*;

  fn slice(label: &str, value: usize, share: f64, i: usize) -> ChartSlice {
    ChartSlice {
      label: label.into(),
      value,
      share,
      color: palette_color(i),
    }
  }

  #[test]
  fn strip_fills_the_width() {
    let slices = [
      slice("US", 2, 2.0 / 3.0, 0),
      slice("CA", 1, 1.0 / 3.0, 1),
    ];
    let line = strip(&slices, 30);
    assert_eq!(line.width(), 30);
    assert_eq!(line.spans.len(), 2);
    assert_eq!(line.spans[0].content.chars().count(), 20);
    assert_eq!(line.spans[0].style.fg, Some(Color::Rgb(0xFF, 0x63, 0x84)));
  }

  #[test]
  fn tiny_share_may_round_to_nothing() {
    let slices = [slice("US", 99, 0.99, 0), slice("NZ", 1, 0.01, 1)];
    let line = strip(&slices, 10);
    assert_eq!(line.width(), 10);
    assert_eq!(line.spans.len(), 1);
  }

  #[test]
  fn color_maps_rgb() {
    assert_eq!(color(Rgb(1, 2, 3)), Color::Rgb(1, 2, 3));
  }
}
