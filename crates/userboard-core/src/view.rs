//! Derived views: computed from the current records and the search string on
//! every render, never stored.

use std::collections::HashMap;

use crate::user::UserRecord;

// ─── Search filter ───────────────────────────────────────────────────────────

/// Case-insensitive match against `"{first} {last}"` or the email.
/// An empty search matches everything.
pub fn matches(record: &UserRecord, search: &str) -> bool {
  let needle = search.to_lowercase();
  record.full_name().to_lowercase().contains(&needle)
    || record.email.to_lowercase().contains(&needle)
}

/// Positions of the records matching `search`, in insertion order.
pub fn filter_indices(records: &[UserRecord], search: &str) -> Vec<usize> {
  records
    .iter()
    .enumerate()
    .filter(|(_, r)| matches(r, search))
    .map(|(i, _)| i)
    .collect()
}

/// Records matching `search`, in insertion order.
pub fn filter_records<'a>(records: &'a [UserRecord], search: &str) -> Vec<&'a UserRecord> {
  records.iter().filter(|r| matches(r, search)).collect()
}

// ─── Country aggregation ─────────────────────────────────────────────────────

/// Record count per country, iterated in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCounts {
  entries: Vec<(String, usize)>,
}

impl CountryCounts {
  pub fn get(&self, country: &str) -> Option<usize> {
    self
      .entries
      .iter()
      .find(|(c, _)| c == country)
      .map(|(_, n)| *n)
  }

  /// Number of distinct countries.
  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// Sum of all counts; equals the number of records aggregated.
  pub fn total(&self) -> usize { self.entries.iter().map(|(_, n)| n).sum() }

  /// Fraction of records in `country`, `0.0` when there are no records.
  pub fn share(&self, country: &str) -> f64 {
    let total = self.total();
    if total == 0 {
      return 0.0;
    }
    self.get(country).unwrap_or(0) as f64 / total as f64
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.entries.iter().map(|(c, n)| (c.as_str(), *n))
  }
}

/// Count records per country. Country names are used exactly as given.
pub fn country_counts(records: &[UserRecord]) -> CountryCounts {
  let mut index: HashMap<&str, usize> = HashMap::new();
  let mut entries: Vec<(String, usize)> = Vec::new();
  for record in records {
    let country = record.location.country.as_str();
    match index.get(country) {
      Some(&slot) => entries[slot].1 += 1,
      None => {
        index.insert(country, entries.len());
        entries.push((country.to_string(), 1));
      }
    }
  }
  CountryCounts { entries }
}

// ─── Chart input ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Slice colours for the country chart.
pub const PALETTE: [Rgb; 5] = [
  Rgb(0xFF, 0x63, 0x84),
  Rgb(0x36, 0xA2, 0xEB),
  Rgb(0xFF, 0xCE, 0x56),
  Rgb(0x8B, 0xC3, 0x4A),
  Rgb(0xFF, 0x98, 0x00),
];

/// Colour for the `index`-th category. Wraps around after the fifth.
pub fn palette_color(index: usize) -> Rgb { PALETTE[index % PALETTE.len()] }

/// One slice of the country chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
  pub label: String,
  pub value: usize,
  pub share: f64,
  pub color: Rgb,
}

/// One slice per distinct country, in first-appearance order.
pub fn chart_slices(counts: &CountryCounts) -> Vec<ChartSlice> {
  counts
    .iter()
    .enumerate()
    .map(|(i, (label, value))| ChartSlice {
      label: label.to_string(),
      value,
      share: counts.share(label),
      color: palette_color(i),
    })
    .collect()
}
