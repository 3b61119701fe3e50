//! User records as delivered by the randomuser.me sample-data API.
//!
//! Nothing here is validated: absent text fields deserialise as empty strings
//! so a partially-populated person still renders instead of failing the whole
//! page.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Identifier as reported by the source, e.g. `{"name": "SSN", "value": "..."}`.
///
/// The source sends `null` values for some nationalities, so `value` is
/// optional. Records without a value can never be removed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
  #[serde(default)]
  pub name:  String,
  #[serde(default)]
  pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub first: String,
  #[serde(default)]
  pub last:  String,
}

// ─── Location ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
  #[serde(default)]
  pub number: NumberOrText,
  #[serde(default)]
  pub name:   String,
}

/// A location field the source emits as either a JSON number or a string,
/// depending on nationality (postcodes `71040` / `"V3N 2B5"`, street
/// numbers `4512` / `"12"`). Displayed as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
  Number(i64),
  Text(String),
}

impl Default for NumberOrText {
  fn default() -> Self { Self::Text(String::new()) }
}

impl fmt::Display for NumberOrText {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(n) => write!(f, "{n}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  #[serde(default)]
  pub street:   Street,
  #[serde(default)]
  pub city:     String,
  #[serde(default)]
  pub state:    String,
  #[serde(default)]
  pub country:  String,
  #[serde(default)]
  pub postcode: NumberOrText,
}

impl Location {
  /// `"{number} {street}, {city}, {state}, {postcode}"`.
  pub fn address_line(&self) -> String {
    format!(
      "{} {}, {}, {}, {}",
      self.street.number, self.street.name, self.city, self.state, self.postcode
    )
  }
}

// ─── Picture ─────────────────────────────────────────────────────────────────

/// Avatar URLs in the three sizes the source provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
  #[serde(default)]
  pub large:     String,
  #[serde(default)]
  pub medium:    String,
  #[serde(default)]
  pub thumbnail: String,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One fetched person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
  #[serde(default)]
  pub id:       UserId,
  #[serde(default)]
  pub gender:   String,
  #[serde(default)]
  pub name:     PersonName,
  #[serde(default)]
  pub location: Location,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub phone:    String,
  #[serde(default)]
  pub cell:     String,
  #[serde(default)]
  pub picture:  Picture,
  #[serde(default)]
  pub nat:      String,
}

impl UserRecord {
  /// `"{first} {last}"`, the string the search filter matches against.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.name.first, self.name.last)
  }

  /// The identifier value used by [`RecordStore::remove_record`](crate::store::RecordStore::remove_record).
  pub fn identifier(&self) -> Option<&str> { self.id.value.as_deref() }

  /// Up to two uppercase initials, used in place of the avatar image.
  pub fn initials(&self) -> String {
    [&self.name.first, &self.name.last]
      .into_iter()
      .filter_map(|part| part.chars().next())
      .flat_map(char::to_uppercase)
      .collect()
  }
}

// ─── Response envelope ───────────────────────────────────────────────────────

/// Paging metadata echoed back by the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
  #[serde(default)]
  pub seed:    String,
  #[serde(default)]
  pub results: usize,
  #[serde(default)]
  pub page:    usize,
  #[serde(default)]
  pub version: String,
}

/// Top-level response body: `{ "results": [...], "info": {...} }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPage {
  pub results: Vec<UserRecord>,
  #[serde(default)]
  pub info:    Option<PageInfo>,
}
