//! Error types for `userboard-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The source could not deliver records: transport failure, non-success
  /// status, or an undecodable body.
  #[error("fetch failed: {0}")]
  Fetch(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
