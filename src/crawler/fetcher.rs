//! HTTP lookup implementation
//!
//! This module handles the requests to the autocomplete endpoint, including:
//! - Building the HTTP client with user agent and timeouts
//! - Building the query URL
//! - Decoding the `{"results": [...]}` response body
//! - Error classification

use crate::config::{ApiConfig, CrawlerConfig};
use crate::{LookupError, LookupResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A single-attempt autocomplete lookup
///
/// Implementations perform exactly one request per call; retrying is the
/// gateway's job.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Returns the completions the service offers for `query`
    async fn lookup(&self, query: &str) -> LookupResult<Vec<String>>;
}

#[async_trait]
impl<T: Lookup + ?Sized> Lookup for Arc<T> {
    async fn lookup(&self, query: &str) -> LookupResult<Vec<String>> {
        (**self).lookup(query).await
    }
}

/// Response body of the autocomplete endpoint
#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    results: Vec<String>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `api` - The endpoint configuration (user agent)
/// * `timeout` - Timeout applied to each request
pub fn build_http_client(api: &ApiConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(api.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Autocomplete lookup over HTTP
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
    endpoint: Url,
}

impl HttpLookup {
    /// Creates a lookup from configuration
    pub fn from_config(api: &ApiConfig, crawler: &CrawlerConfig) -> crate::Result<Self> {
        let client = build_http_client(api, crawler.request_timeout())?;
        let endpoint = endpoint_url(api).map_err(LookupError::from)?;
        Ok(Self { client, endpoint })
    }

    /// Returns the URL requested for `query`
    pub fn query_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url
    }
}

#[async_trait]
impl Lookup for HttpLookup {
    async fn lookup(&self, query: &str) -> LookupResult<Vec<String>> {
        let url = self.query_url(query);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(query, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                query: query.to_string(),
                status: status.as_u16(),
            });
        }

        let body: AutocompleteResponse =
            response.json().await.map_err(|e| LookupError::Decode {
                query: query.to_string(),
                message: e.to_string(),
            })?;

        Ok(body.results)
    }
}

/// Appends the endpoint path to the base URL, keeping any path the base carries
pub fn endpoint_url(api: &ApiConfig) -> Result<Url, url::ParseError> {
    let base = api.base_url.trim_end_matches('/');
    let endpoint = api.endpoint.trim_start_matches('/');
    Url::parse(&format!("{}/{}", base, endpoint))
}

fn classify_error(query: &str, error: reqwest::Error) -> LookupError {
    if error.is_timeout() {
        LookupError::Timeout {
            query: query.to_string(),
        }
    } else {
        LookupError::Http {
            query: query.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_api(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            endpoint: "/v1/autocomplete".to_string(),
            user_agent: "TestSweeper/1.0".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let api = create_test_api("http://localhost:8000");
        let client = build_http_client(&api, Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_query_url_encodes_prefix() {
        let api = create_test_api("http://localhost:8000");
        let lookup = HttpLookup::from_config(&api, &CrawlerConfig::default()).unwrap();

        let url = lookup.query_url("a b&c");
        assert_eq!(url.path(), "/v1/autocomplete");
        assert_eq!(url.query(), Some("query=a+b%26c"));
    }

    #[test]
    fn test_base_url_path_is_kept() {
        let api = create_test_api("http://localhost:8000/api");
        let lookup = HttpLookup::from_config(&api, &CrawlerConfig::default()).unwrap();

        let url = lookup.query_url("a");
        assert_eq!(url.path(), "/api/v1/autocomplete");
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/autocomplete?query=a");
    }

    #[test]
    fn test_endpoint_url_trims_slashes() {
        let api = create_test_api("http://localhost:8000/api/");
        assert_eq!(
            endpoint_url(&api).unwrap().as_str(),
            "http://localhost:8000/api/v1/autocomplete"
        );

        let api = create_test_api("http://localhost:8000");
        assert_eq!(
            endpoint_url(&api).unwrap().as_str(),
            "http://localhost:8000/v1/autocomplete"
        );
    }

    #[test]
    fn test_missing_results_field_decodes_as_empty() {
        let body: AutocompleteResponse = serde_json::from_str(r#"{"version": "v1"}"#).unwrap();
        assert!(body.results.is_empty());

        let body: AutocompleteResponse =
            serde_json::from_str(r#"{"results": ["aa", "ab"]}"#).unwrap();
        assert_eq!(body.results, vec!["aa", "ab"]);
    }

    // Request/response behaviour is covered with wiremock in the integration tests
}
