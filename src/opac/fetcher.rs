//! Two-phase HTTP lookup against the NLC OPAC
//!
//! The OPAC is session-scoped: a plain GET on the base endpoint returns a
//! page embedding a session URL, and only that URL accepts search queries.
//! Phase one discovers the session URL, phase two issues the ISBN search
//! against it. Each phase runs under the configured timeout and is never
//! retried here; retry policy belongs to the caller.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::{config::OpacConfig, error::AppError, opac::headers};

/// Fixed filter parameters required by the OPAC search endpoint. These are
/// a contract imposed by the remote service, not configuration.
const SEARCH_FILTERS: &str = "&filter_code_1=WLN&filter_request_1=\
&filter_code_2=WYR&filter_request_2=\
&filter_code_3=WYR&filter_request_3=\
&filter_code_4=WFM&filter_request_4=\
&filter_code_5=WSL&filter_request_5=";

/// Failure modes of a single catalog lookup
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Phase one failed: the base endpoint was unreachable or its response
    /// did not embed a session URL.
    #[error("session discovery failed: {0}")]
    Discovery(String),

    #[error("search request timed out")]
    Timeout,

    #[error("search returned HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(reqwest::Error),
}

impl FetchError {
    fn classify(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::SourceUnavailable(e.to_string())
    }
}

/// Narrow seam over the bibliographic source: the scraping client below is
/// the production implementation, tests substitute a mock, and a structured
/// API client could replace it without touching parsing or normalization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the raw search-result markup for a canonical ISBN.
    async fn fetch(&self, isbn: &str) -> Result<String, FetchError>;
}

/// HTTP client for the NLC OPAC
pub struct OpacClient {
    client: Client,
    base_url: String,
    session_pattern: Regex,
}

impl OpacClient {
    pub fn new(config: &OpacConfig) -> Result<Self, AppError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid OPAC base URL: {}", e)))?;
        let host = base
            .host_str()
            .ok_or_else(|| AppError::Internal("OPAC base URL has no host".to_string()))?;

        // Session URLs embed the host with an explicit port, e.g.
        // http://opac.nlc.cn:80/F/<session-id>
        let pattern = format!(
            r#"{}://{}(:\d+)?/F/[^\s"'?]*"#,
            base.scheme(),
            regex::escape(host)
        );
        let session_pattern = Regex::new(&pattern)
            .map_err(|e| AppError::Internal(format!("Invalid session URL pattern: {}", e)))?;

        let client = Client::builder()
            .default_headers(headers::browser_profile())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session_pattern,
        })
    }

    /// Phase one: fetch the base endpoint and scan for the session URL.
    async fn discover_session_url(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| FetchError::Discovery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Discovery(format!(
                "base endpoint returned HTTP status {}",
                response.status().as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Discovery(e.to_string()))?;

        let session_url = self
            .session_pattern
            .find(&body)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                FetchError::Discovery("no session URL found in base endpoint response".to_string())
            })?;

        tracing::debug!("OPAC session URL discovered: {}", session_url);
        Ok(session_url)
    }
}

#[async_trait]
impl MetadataSource for OpacClient {
    async fn fetch(&self, isbn: &str) -> Result<String, FetchError> {
        let session_url = self.discover_session_url().await?;

        let search_url = format!(
            "{}?func=find-b&find_code=ISB&request={}&local_base=NLC01{}",
            session_url, isbn, SEARCH_FILTERS
        );
        tracing::debug!("OPAC search URL: {}", search_url);

        let response = self
            .client
            .get(&search_url)
            .send()
            .await
            .map_err(FetchError::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(FetchError::classify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> OpacConfig {
        OpacConfig {
            base_url: format!("{}/F", server.uri()),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn fetches_through_discovered_session_url() {
        let server = MockServer::start().await;
        let session_url = format!("{}/F/SESSION-ABC123", server.uri());

        Mock::given(method("GET"))
            .and(path("/F"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                "<html><script>var new_url = \"{}?func=file\";</script></html>",
                session_url
            )))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/F/SESSION-ABC123"))
            .and(query_param("func", "find-b"))
            .and(query_param("request", "9787565802270"))
            .and(query_param("local_base", "NLC01"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<table id=\"td\"></table>"),
            )
            .mount(&server)
            .await;

        let client = OpacClient::new(&test_config(&server)).unwrap();
        let html = client.fetch("9787565802270").await.unwrap();
        assert!(html.contains("table"));
    }

    #[tokio::test]
    async fn discovery_fails_without_session_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/F"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing here</html>"))
            .mount(&server)
            .await;

        let client = OpacClient::new(&test_config(&server)).unwrap();
        let err = client.fetch("9787565802270").await.unwrap_err();
        assert!(matches!(err, FetchError::Discovery(_)));
    }

    #[tokio::test]
    async fn search_error_status_is_reported() {
        let server = MockServer::start().await;
        let session_url = format!("{}/F/SESSION-XYZ", server.uri());

        Mock::given(method("GET"))
            .and(path("/F"))
            .respond_with(ResponseTemplate::new(200).set_body_string(session_url.clone()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/F/SESSION-XYZ"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OpacClient::new(&test_config(&server)).unwrap();
        let err = client.fetch("9787565802270").await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }
}
