//! Shared fixtures for unit tests.

use std::future::Future;

use userboard_core::{
  Error,
  source::UserSource,
  user::{Location, NumberOrText, PersonName, Street, UserId, UserRecord},
};

/// A user source that returns a fixed outcome without touching the network.
pub struct StubSource {
  outcome: Result<Vec<UserRecord>, String>,
}

impl StubSource {
  pub fn ok(users: Vec<UserRecord>) -> Self { Self { outcome: Ok(users) } }

  pub fn failing(message: &str) -> Self {
    Self {
      outcome: Err(message.to_string()),
    }
  }
}

impl UserSource for StubSource {
  type Error = Error;

  fn fetch_users(
    &self,
    count: usize,
  ) -> impl Future<Output = Result<Vec<UserRecord>, Error>> + Send + '_ {
    let outcome = self
      .outcome
      .clone()
      .map(|mut users| {
        users.truncate(count);
        users
      })
      .map_err(Error::Fetch);
    async move { outcome }
  }
}

pub fn user(id: &str, first: &str, last: &str, email: &str, country: &str) -> UserRecord {
  UserRecord {
    id: UserId {
      name:  "SSN".into(),
      value: Some(id.into()),
    },
    name: PersonName {
      title: "Mx".into(),
      first: first.into(),
      last:  last.into(),
    },
    email: email.into(),
    phone: "555-0100".into(),
    location: Location {
      street: Street {
        number: NumberOrText::Number(12),
        name:   "Main St".into(),
      },
      city: "Springfield".into(),
      state: "Oregon".into(),
      country: country.into(),
      ..Location::default()
    },
    ..UserRecord::default()
  }
}

pub fn three_users() -> Vec<UserRecord> {
  vec![
    user("1", "Ann", "Lee", "ann.lee@example.com", "US"),
    user("2", "Bob", "Stone", "bob@example.com", "US"),
    user("3", "Joe", "Smith", "joe@canada.com", "CA"),
  ]
}
