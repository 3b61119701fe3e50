//! Application state and event dispatcher.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use userboard_core::{
  expansion::Expansion,
  source::UserSource,
  store::{LoadTicket, RecordStore},
  user::UserRecord,
  view::{ChartSlice, chart_slices, country_counts, filter_indices},
};

use crate::client::ApiClient;

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Moving between cards.
  Browse,
  /// Typing into the search field.
  Search,
}

/// Result of a fetch task, delivered back to the event loop.
#[derive(Debug)]
pub enum FetchOutcome {
  Load {
    ticket:  LoadTicket,
    outcome: Result<Vec<UserRecord>, String>,
  },
  Append(Result<Vec<UserRecord>, String>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S = ApiClient> {
  pub mode: Mode,

  /// The record store. Mutated only from the event loop.
  pub store: RecordStore,

  /// Current search string.
  pub search: String,

  /// Which card shows its details.
  pub expansion: Expansion,

  /// Cursor position within the *visible* card list.
  pub cursor: usize,

  /// Cards per grid row, set from the terminal width before each frame.
  pub columns: usize,

  /// Indices into `store.records()` matching `search`.
  visible: Vec<usize>,

  /// Country chart input over all records.
  slices: Vec<ChartSlice>,

  /// Set by the store subscription or a search edit; cleared by
  /// [`App::refresh_view`].
  view_stale: Arc<AtomicBool>,

  /// Whether a single-user append is in flight.
  pub appending: bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  source: Arc<S>,
  result_count: usize,
  outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
  outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<S> App<S>
where
  S: UserSource + 'static,
{
  /// Create an [`App`] with an empty, not-yet-loaded store.
  pub fn new(source: S, result_count: usize) -> Self {
    let mut store = RecordStore::new();
    let view_stale = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&view_stale);
    store.subscribe(move |_| flag.store(true, Ordering::Relaxed));

    let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
    let mut app = Self {
      mode: Mode::Browse,
      store,
      search: String::new(),
      expansion: Expansion::new(),
      cursor: 0,
      columns: 1,
      visible: Vec::new(),
      slices: Vec::new(),
      view_stale,
      appending: false,
      status_msg: String::new(),
      source: Arc::new(source),
      result_count,
      outcomes_tx,
      outcomes_rx,
    };
    app.refresh_view();
    app
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Issue the initial load. Does nothing if a load is in flight or the
  /// store is already loaded.
  pub fn start_load(&mut self) -> bool {
    match self.store.begin_load() {
      Some(ticket) => {
        self.spawn_load(ticket);
        true
      }
      None => false,
    }
  }

  /// Refetch and replace everything. Refused while a load is in flight.
  pub fn reload(&mut self) -> bool {
    match self.store.begin_reload() {
      Some(ticket) => {
        self.spawn_load(ticket);
        true
      }
      None => false,
    }
  }

  fn spawn_load(&mut self, ticket: LoadTicket) {
    self.status_msg = "Loading users…".into();
    tracing::info!(generation = ticket.generation(), count = self.result_count, "loading users");
    let source = Arc::clone(&self.source);
    let tx = self.outcomes_tx.clone();
    let count = self.result_count;
    tokio::spawn(async move {
      let outcome = source.fetch_users(count).await.map_err(|e| e.to_string());
      // The receiver only goes away when the app is shutting down.
      let _ = tx.send(FetchOutcome::Load { ticket, outcome });
    });
  }

  /// Fetch one more user and append it to the store.
  pub fn append_one(&mut self) -> bool {
    if self.appending {
      return false;
    }
    self.appending = true;
    self.status_msg = "Fetching one more user…".into();
    let source = Arc::clone(&self.source);
    let tx = self.outcomes_tx.clone();
    tokio::spawn(async move {
      let outcome = source.fetch_users(1).await.map_err(|e| e.to_string());
      let _ = tx.send(FetchOutcome::Append(outcome));
    });
    true
  }

  /// Apply every fetch result that has arrived since the last tick.
  /// Returns `true` if anything was applied.
  pub fn drain_outcomes(&mut self) -> bool {
    let mut any = false;
    while let Ok(outcome) = self.outcomes_rx.try_recv() {
      self.apply_outcome(outcome);
      any = true;
    }
    any
  }

  fn apply_outcome(&mut self, outcome: FetchOutcome) {
    match outcome {
      FetchOutcome::Load { ticket, outcome } => {
        let failed = outcome.as_ref().err().cloned();
        if self.store.complete_load(ticket, outcome) {
          self.status_msg = match failed {
            Some(e) => format!("Error fetching data: {e}"),
            None => String::new(),
          };
        }
      }
      FetchOutcome::Append(outcome) => {
        self.appending = false;
        match outcome {
          Ok(users) => {
            for user in users {
              self.store.add_record(user);
            }
            self.status_msg = String::new();
          }
          Err(e) => {
            tracing::error!(error = %e, "error fetching additional user");
            self.status_msg = format!("Error fetching data: {e}");
          }
        }
      }
    }
    self.refresh_view();
  }

  /// Remove the user under the cursor (and any sharing its identifier).
  pub fn remove_selected(&mut self) {
    let Some(user) = self.selected() else {
      return;
    };
    match user.identifier().map(str::to_string) {
      Some(id) => {
        let removed = self.store.remove_record(&id);
        tracing::info!(identifier = %id, removed, "removed users");
        self.status_msg = format!("Removed {removed} user(s)");
        self.refresh_view();
      }
      None => {
        self.status_msg = "This user has no identifier and cannot be removed".into();
      }
    }
  }

  // ── Derived view ──────────────────────────────────────────────────────────

  /// Recompute the filtered list and chart input if the store or the
  /// search changed since the last call.
  pub fn refresh_view(&mut self) {
    if !self.view_stale.swap(false, Ordering::Relaxed) {
      return;
    }
    let records = self.store.records();
    self.visible = filter_indices(records, &self.search);
    self.slices = chart_slices(&country_counts(records));
    if self.cursor >= self.visible.len() {
      self.cursor = self.visible.len().saturating_sub(1);
    }
  }

  fn search_changed(&mut self) {
    self.cursor = 0;
    self.view_stale.store(true, Ordering::Relaxed);
    self.refresh_view();
  }

  /// Users matching the search, in insertion order.
  pub fn visible_users(&self) -> impl Iterator<Item = &UserRecord> + '_ {
    let records = self.store.records();
    self.visible.iter().filter_map(|&i| records.get(i))
  }

  pub fn visible_count(&self) -> usize { self.visible.len() }

  pub fn slices(&self) -> &[ChartSlice] { &self.slices }

  /// The user under the card cursor, if any.
  pub fn selected(&self) -> Option<&UserRecord> {
    self
      .visible
      .get(self.cursor)
      .and_then(|&i| self.store.records().get(i))
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Search => {
        self.handle_search_key(key);
        true
      }
      Mode::Browse => self.handle_browse_key(key),
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Browse;
        self.search.clear();
        self.search_changed();
      }
      KeyCode::Enter => self.mode = Mode::Browse,
      KeyCode::Backspace => {
        self.search.pop();
        self.search_changed();
      }
      KeyCode::Char(c) => {
        self.search.push(c);
        self.search_changed();
      }
      _ => {}
    }
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    let len = self.visible.len();
    let columns = self.columns.max(1);
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Char('/') => self.mode = Mode::Search,

      KeyCode::Right | KeyCode::Char('l') => {
        if self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + columns < len {
          self.cursor += columns;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.cursor >= columns {
          self.cursor -= columns;
        }
      }

      KeyCode::Enter | KeyCode::Char(' ') => {
        if let Some(email) = self.selected().map(|u| u.email.clone()) {
          self.expansion.toggle(&email);
        }
      }
      KeyCode::Esc => self.expansion.collapse(),

      KeyCode::Char('a') => {
        self.append_one();
      }
      KeyCode::Char('d') => self.remove_selected(),
      KeyCode::Char('r') => {
        if !self.reload() {
          self.status_msg = "A load is already in progress".into();
        }
      }

      _ => {}
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyEventKind, KeyEventState};
  use userboard_core::store::LoadState;

  use super::*;
  use crate::test_support::{StubSource, three_users, user};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  fn type_text(app: &mut App<StubSource>, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
  }

  fn loaded_app() -> App<StubSource> {
    let mut app = App::new(StubSource::ok(Vec::new()), 10);
    app.store.set_records(three_users());
    app.refresh_view();
    app
  }

  impl<S: UserSource + 'static> App<S> {
    /// Wait for one fetch result and apply it.
    async fn settle(&mut self) {
      let outcome = self.outcomes_rx.recv().await.expect("fetch outcome");
      self.apply_outcome(outcome);
    }
  }

  #[tokio::test]
  async fn initial_load_populates_store() {
    let mut app = App::new(StubSource::ok(three_users()), 10);
    assert!(app.start_load());
    assert!(!app.start_load(), "second load while in flight");
    app.settle().await;

    assert_eq!(app.store.len(), 3);
    assert_eq!(app.store.load_state(), &LoadState::Loaded);
    assert_eq!(app.visible_count(), 3);
    assert_eq!(app.slices().len(), 2);
    assert!(app.status_msg.is_empty());
    assert!(!app.start_load(), "already loaded");
  }

  #[tokio::test]
  async fn failed_load_leaves_empty_store_and_reports() {
    let mut app = App::new(StubSource::failing("connection refused"), 10);
    app.start_load();
    app.settle().await;

    assert!(app.store.is_empty());
    assert!(matches!(app.store.load_state(), LoadState::Failed(_)));
    assert_eq!(app.visible_count(), 0);
    assert!(app.status_msg.contains("connection refused"));
  }

  #[tokio::test]
  async fn load_then_summarise_and_search() {
    let mut app = App::new(StubSource::ok(three_users()), 10);
    app.start_load();
    app.settle().await;

    assert_eq!(app.store.len(), 3);
    let slices: Vec<_> = app
      .slices()
      .iter()
      .map(|s| (s.label.as_str(), s.value))
      .collect();
    assert_eq!(slices, [("US", 2), ("CA", 1)]);

    // "ca" is not in "Joe Smith" but is in the email.
    app.handle_key(key(KeyCode::Char('/')));
    type_text(&mut app, "ca");
    let emails: Vec<_> = app.visible_users().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["joe@canada.com"]);
    // The chart ignores the search.
    assert_eq!(app.slices().len(), 2);
    assert!((app.slices()[0].share - 2.0 / 3.0).abs() < f64::EPSILON);
  }

  #[tokio::test]
  async fn append_adds_one_user_at_the_end() {
    let mut app = loaded_app();
    app.source = Arc::new(StubSource::ok(vec![user("9", "New", "Person", "new@example.com", "DE")]));

    assert!(app.append_one());
    assert!(!app.append_one(), "one append at a time");
    app.settle().await;

    assert_eq!(app.store.len(), 4);
    assert_eq!(app.store.records()[3].email, "new@example.com");
    assert_eq!(app.slices().len(), 3);
    assert!(!app.appending);
  }

  #[test]
  fn typing_filters_cards() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.mode, Mode::Search);

    type_text(&mut app, "ca");
    assert_eq!(app.search, "ca");
    let emails: Vec<_> = app.visible_users().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["joe@canada.com"]);
    // Chart still covers everyone.
    assert_eq!(app.slices().iter().map(|s| s.value).sum::<usize>(), 3);

    app.handle_key(key(KeyCode::Backspace));
    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.visible_count(), 3);
  }

  #[test]
  fn escape_in_search_clears_it() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Char('/')));
    type_text(&mut app, "zzz");
    assert_eq!(app.visible_count(), 0);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.mode, Mode::Browse);
    assert!(app.search.is_empty());
    assert_eq!(app.visible_count(), 3);
  }

  #[test]
  fn enter_toggles_single_expansion() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.expansion.expanded(), Some("ann.lee@example.com"));

    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.expansion.expanded(), Some("bob@example.com"));

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.expansion.expanded(), None);
  }

  #[test]
  fn cursor_moves_by_rows_in_grid() {
    let mut app = loaded_app();
    app.columns = 2;
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.cursor, 2);
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.cursor, 2, "no row below");
    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.cursor, 0);
    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.cursor, 0);
  }

  #[test]
  fn delete_removes_selected_by_identifier() {
    let mut app = loaded_app();
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Char('d')));

    let emails: Vec<_> = app.visible_users().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, ["ann.lee@example.com", "joe@canada.com"]);
    assert_eq!(app.cursor, 1);
  }

  #[test]
  fn cursor_is_clamped_after_removing_last_card() {
    let mut app = loaded_app();
    app.cursor = 2;
    app.remove_selected();
    assert_eq!(app.visible_count(), 2);
    assert_eq!(app.cursor, 1);
  }

  #[test]
  fn quit_keys() {
    let mut app = loaded_app();
    assert!(!app.handle_key(key(KeyCode::Char('q'))));
    let ctrl_c = KeyEvent {
      modifiers: KeyModifiers::CONTROL,
      ..key(KeyCode::Char('c'))
    };
    app.mode = Mode::Search;
    assert!(!app.handle_key(ctrl_c));
  }
}
