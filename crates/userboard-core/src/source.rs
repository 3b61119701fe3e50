//! The `UserSource` trait: where user records come from.
//!
//! Implemented by the HTTP client in `userboard-cli`; tests implement it with
//! canned results.

use std::future::Future;

use crate::user::UserRecord;

/// Number of records requested by the initial load.
pub const DEFAULT_RESULT_COUNT: usize = 10;

/// Abstraction over the external sample-data endpoint.
pub trait UserSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch `count` user records, in the order the source returns them.
  fn fetch_users(
    &self,
    count: usize,
  ) -> impl Future<Output = Result<Vec<UserRecord>, Self::Error>> + Send + '_;
}
