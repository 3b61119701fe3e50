//! Async HTTP client for the randomuser.me sample-data API.

use std::{future::Future, time::Duration};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder};
use userboard_core::{
  source::UserSource,
  user::{UserPage, UserRecord},
};

pub const DEFAULT_BASE_URL: &str = "https://randomuser.me/api/";

/// Connection settings for the sample-data endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Fixed seed so repeated runs return the same people.
  pub seed:     Option<String>,
  /// Request timeout; `None` waits indefinitely.
  pub timeout:  Option<Duration>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      seed:     None,
      timeout:  None,
    }
  }
}

/// Async HTTP client for the user endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn users_request(&self, count: usize) -> RequestBuilder {
    let mut query = vec![("results", count.to_string())];
    if let Some(seed) = &self.config.seed {
      query.push(("seed", seed.clone()));
    }
    self.client.get(&self.config.base_url).query(&query)
  }

  /// `GET <base_url>?results=<count>[&seed=<seed>]`
  pub async fn list_users(&self, count: usize) -> Result<Vec<UserRecord>> {
    let resp = self
      .users_request(count)
      .send()
      .await
      .context("GET users failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET users → {}", resp.status()));
    }
    let page: UserPage = resp.json().await.context("deserialising users")?;
    tracing::debug!(
      count = page.results.len(),
      seed = page.info.as_ref().map(|i| i.seed.as_str()),
      "fetched users"
    );
    Ok(page.results)
  }
}

impl UserSource for ApiClient {
  type Error = userboard_core::Error;

  fn fetch_users(
    &self,
    count: usize,
  ) -> impl Future<Output = Result<Vec<UserRecord>, Self::Error>> + Send + '_ {
    async move {
      self
        .list_users(count)
        .await
        .map_err(|e| userboard_core::Error::Fetch(format!("{e:#}")))
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use userboard_core::Error;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;

  fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: format!("{}/api/", server.uri()),
      ..ApiConfig::default()
    })
    .unwrap()
  }

  #[test]
  fn request_asks_for_the_given_count() {
    let client = ApiClient::new(ApiConfig::default()).unwrap();
    let req = client.users_request(10).build().unwrap();
    assert_eq!(req.method(), reqwest::Method::GET);
    assert_eq!(req.url().host_str(), Some("randomuser.me"));
    assert_eq!(req.url().path(), "/api/");
    assert_eq!(req.url().query(), Some("results=10"));
  }

  #[test]
  fn seed_is_forwarded() {
    let client = ApiClient::new(ApiConfig {
      seed: Some("kittens".into()),
      ..ApiConfig::default()
    })
    .unwrap();
    let req = client.users_request(1).build().unwrap();
    assert_eq!(req.url().query(), Some("results=1&seed=kittens"));
  }

  // ─── Against a mock server ──────────────────────────────────────────────

  #[tokio::test]
  async fn fetch_decodes_a_page_of_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/"))
      .and(query_param("results", "10"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "results": [
          {
            "name": { "title": "Ms", "first": "Ann", "last": "Lee" },
            "email": "ann.lee@example.com",
            "id": { "name": "SSN", "value": "1" },
            "location": {
              "street": { "number": 12, "name": "Main St" },
              "country": "United States",
              "postcode": "12345"
            }
          },
          {
            "name": { "title": "Mr", "first": "Joe", "last": "Smith" },
            "email": "joe@canada.com",
            "id": { "name": "SIN", "value": null },
            "location": { "country": "Canada", "postcode": 90210 }
          }
        ],
        "info": { "seed": "abc", "results": 2, "page": 1, "version": "1.4" }
      })))
      .mount(&server)
      .await;

    let users = client_for(&server).fetch_users(10).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].full_name(), "Ann Lee");
    assert_eq!(users[0].identifier(), Some("1"));
    assert_eq!(users[1].email, "joe@canada.com");
    assert_eq!(users[1].identifier(), None);
    assert_eq!(users[1].location.postcode.to_string(), "90210");
  }

  #[tokio::test]
  async fn server_error_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let result = client_for(&server).fetch_users(10).await;

    match result {
      Err(Error::Fetch(message)) => assert!(message.contains("500"), "{message}"),
      other => panic!("expected a fetch error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn body_without_results_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/api/"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Uh oh" })))
      .mount(&server)
      .await;

    let result = client_for(&server).fetch_users(10).await;

    let message = match result {
      Err(Error::Fetch(message)) => message,
      other => panic!("expected a fetch error, got {other:?}"),
    };
    assert!(message.starts_with("deserialising users"), "{message}");
    // The decoder's reason is reported exactly once.
    assert_eq!(message.matches("missing field").count(), 1, "{message}");
  }
}
