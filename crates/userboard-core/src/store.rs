//! The record store: the single in-memory container of fetched users.
//!
//! The store is an explicit object owned by the application and handed to
//! the view layer. Views learn about changes through [`RecordStore::subscribe`]
//! rather than polling.
//!
//! Loading is tracked by an explicit [`LoadState`], so "never fetched" and
//! "fetched, zero results" are different states.

use std::fmt;

use crate::user::UserRecord;

// ─── Load state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
  #[default]
  NotLoaded,
  Loading,
  Loaded,
  /// The last load failed; carries the error message.
  Failed(String),
}

impl LoadState {
  pub fn is_loading(&self) -> bool { matches!(self, Self::Loading) }
}

/// Handle for one in-flight load. Completing a ticket from an older
/// generation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a load ticket must be completed"]
pub struct LoadTicket {
  generation: u64,
}

impl LoadTicket {
  pub fn generation(&self) -> u64 { self.generation }
}

// ─── Notifications ───────────────────────────────────────────────────────────

/// Emitted to subscribers after every mutation that changed the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
  Replaced { count: usize },
  Added,
  Removed { count: usize },
  LoadStateChanged(LoadState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordStore {
  records:         Vec<UserRecord>,
  load_state:      LoadState,
  load_generation: u64,
  revision:        u64,
  next_listener:   u64,
  listeners:       Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for RecordStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RecordStore")
      .field("records", &self.records.len())
      .field("load_state", &self.load_state)
      .field("revision", &self.revision)
      .field("listeners", &self.listeners.len())
      .finish()
  }
}

impl RecordStore {
  pub fn new() -> Self { Self::default() }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Current records, in insertion order.
  pub fn records(&self) -> &[UserRecord] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn load_state(&self) -> &LoadState { &self.load_state }

  /// Bumped on every notified change.
  pub fn revision(&self) -> u64 { self.revision }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Replace the whole sequence.
  pub fn set_records(&mut self, records: Vec<UserRecord>) {
    let count = records.len();
    self.records = records;
    self.notify(StoreEvent::Replaced { count });
  }

  /// Append one record at the end.
  pub fn add_record(&mut self, record: UserRecord) {
    self.records.push(record);
    self.notify(StoreEvent::Added);
  }

  /// Remove every record whose identifier value equals `identifier`.
  /// Returns the number removed; removing nothing does not notify.
  pub fn remove_record(&mut self, identifier: &str) -> usize {
    let before = self.records.len();
    self
      .records
      .retain(|r| r.identifier() != Some(identifier));
    let count = before - self.records.len();
    if count > 0 {
      self.notify(StoreEvent::Removed { count });
    }
    count
  }

  // ── Loading ───────────────────────────────────────────────────────────

  /// Start the initial load. Returns `None` when a load is already in
  /// flight or the store has already been loaded.
  pub fn begin_load(&mut self) -> Option<LoadTicket> {
    match self.load_state {
      LoadState::NotLoaded | LoadState::Failed(_) => Some(self.start_load()),
      LoadState::Loading | LoadState::Loaded => None,
    }
  }

  /// Start an explicit reload. Refused only while a load is in flight.
  pub fn begin_reload(&mut self) -> Option<LoadTicket> {
    if self.load_state.is_loading() {
      None
    } else {
      Some(self.start_load())
    }
  }

  fn start_load(&mut self) -> LoadTicket {
    self.load_generation += 1;
    self.set_load_state(LoadState::Loading);
    LoadTicket {
      generation: self.load_generation,
    }
  }

  /// Apply the outcome of the load identified by `ticket`.
  ///
  /// On success the records are replaced wholesale. On failure the error is
  /// logged and the records are left untouched. Returns `false` if the
  /// ticket is stale and the outcome was discarded.
  pub fn complete_load(
    &mut self,
    ticket: LoadTicket,
    outcome: Result<Vec<UserRecord>, String>,
  ) -> bool {
    if ticket.generation != self.load_generation || !self.load_state.is_loading() {
      tracing::debug!(
        generation = ticket.generation,
        current = self.load_generation,
        "discarding stale load outcome"
      );
      return false;
    }

    match outcome {
      Ok(records) => {
        tracing::info!(count = records.len(), "user records loaded");
        self.set_records(records);
        self.set_load_state(LoadState::Loaded);
      }
      Err(message) => {
        tracing::error!(error = %message, "error fetching user records");
        self.set_load_state(LoadState::Failed(message));
      }
    }
    true
  }

  fn set_load_state(&mut self, state: LoadState) {
    if self.load_state != state {
      self.load_state = state.clone();
      self.notify(StoreEvent::LoadStateChanged(state));
    }
  }

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Register a listener called after every change.
  pub fn subscribe(
    &mut self,
    listener: impl FnMut(&StoreEvent) + Send + 'static,
  ) -> SubscriptionId {
    let id = SubscriptionId(self.next_listener);
    self.next_listener += 1;
    self.listeners.push((id, Box::new(listener)));
    id
  }

  /// Remove a listener. Returns `false` if it was not registered.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.listeners.len();
    self.listeners.retain(|(l, _)| *l != id);
    self.listeners.len() != before
  }

  fn notify(&mut self, event: StoreEvent) {
    self.revision += 1;
    for (_, listener) in &mut self.listeners {
      listener(&event);
    }
  }
}
