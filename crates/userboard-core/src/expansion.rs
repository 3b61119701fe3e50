//! Which card, if any, currently shows its extended details.
//!
//! Keyed by email. Emails are not unique, so two cards sharing an email
//! expand and collapse together.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
  expanded: Option<String>,
}

impl Expansion {
  pub fn new() -> Self { Self::default() }

  /// Expand `email`, or collapse it if it is already the expanded card.
  pub fn toggle(&mut self, email: &str) {
    if self.is_expanded(email) {
      self.expanded = None;
    } else {
      self.expanded = Some(email.to_string());
    }
  }

  pub fn is_expanded(&self, email: &str) -> bool {
    self.expanded.as_deref() == Some(email)
  }

  pub fn expanded(&self) -> Option<&str> { self.expanded.as_deref() }

  pub fn collapse(&mut self) { self.expanded = None; }
}
