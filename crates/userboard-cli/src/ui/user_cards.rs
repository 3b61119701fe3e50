//! User card grid — one card per visible user.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use userboard_core::{source::UserSource, user::UserRecord};

use super::card_columns;
use crate::app::App;

/// Card height with details hidden: borders plus four text rows.
const CARD_HEIGHT: u16 = 6;
/// Card height with the phone and address rows shown.
const EXPANDED_HEIGHT: u16 = 9;
/// Text column, to the right of the avatar.
const INDENT: &str = "      ";

/// Render the card grid into `area`.
pub fn draw<S: UserSource + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let shown = app.visible_count();
  let total = app.store.len();
  let title = if app.search.is_empty() {
    format!(" Users ({total}) ")
  } else {
    format!(" Users ({shown}/{total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if shown == 0 {
    let message = if app.store.load_state().is_loading() {
      "Loading users…".to_string()
    } else if total == 0 {
      "No users.".to_string()
    } else {
      format!("No users match \"{}\".", app.search)
    };
    f.render_widget(
      Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let columns = card_columns(area.width);
  let users: Vec<&UserRecord> = app.visible_users().collect();
  let rows: Vec<&[&UserRecord]> = users.chunks(columns).collect();
  let heights: Vec<u16> = rows
    .iter()
    .map(|row| {
      if row.iter().any(|u| app.expansion.is_expanded(&u.email)) {
        EXPANDED_HEIGHT
      } else {
        CARD_HEIGHT
      }
    })
    .collect();

  let cursor_row = app.cursor / columns;
  let first = first_visible_row(&heights, cursor_row, inner.height);
  let card_width = inner.width / columns as u16;

  let mut y = inner.y;
  for (row_index, row) in rows.iter().enumerate().skip(first) {
    let height = heights[row_index];
    if y + height > inner.y + inner.height {
      break;
    }
    for (col, user) in row.iter().enumerate() {
      let card = Rect {
        x: inner.x + col as u16 * card_width,
        y,
        width: card_width,
        height,
      };
      let selected = row_index * columns + col == app.cursor;
      draw_card(f, card, user, selected, app.expansion.is_expanded(&user.email));
    }
    y += height;
  }
}

/// First grid row to draw so that `cursor_row` fits in `available` rows.
fn first_visible_row(heights: &[u16], cursor_row: usize, available: u16) -> usize {
  let Some(&cursor_height) = heights.get(cursor_row) else {
    return 0;
  };
  let mut first = cursor_row;
  let mut used = cursor_height;
  while first > 0 && used + heights[first - 1] <= available {
    first -= 1;
    used += heights[first];
  }
  first
}

fn draw_card(f: &mut Frame, area: Rect, user: &UserRecord, selected: bool, expanded: bool) {
  let border = if selected { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let avatar = Span::styled(
    format!(" {:<2} ", user.initials()),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Gray)
      .add_modifier(Modifier::BOLD),
  );
  let toggle = if expanded { "[ Hide Details ]" } else { "[ Show Details ]" };
  let toggle_style = if selected {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Cyan)
  };

  let mut lines = vec![
    Line::from(vec![
      avatar,
      Span::raw("  "),
      Span::styled(user.full_name(), Style::default().add_modifier(Modifier::BOLD)),
    ]),
    Line::from(format!("{INDENT}{}", user.email)),
    Line::from(Span::styled(
      format!("{INDENT}{}", user.location.country),
      Style::default().fg(Color::Gray),
    )),
    Line::from(vec![Span::raw(INDENT), Span::styled(toggle, toggle_style)]),
  ];

  if expanded {
    lines.push(Line::from(""));
    lines.push(Line::from(format!("{INDENT}Phone: {}", user.phone)));
    lines.push(Line::from(format!(
      "{INDENT}Address: {}",
      user.location.address_line()
    )));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}
