//! Problem metadata lookups against the LeetCode GraphQL API.
//!
//! The pipelines only see the [`MetadataSource`] trait; [`LeetCodeClient`] is
//! the HTTP implementation. Every call is a single attempt: failures are
//! returned to the caller, which decides whether to skip or degrade.

mod graphql;

use std::future::Future;
use std::time::Duration;

use leetlog_shared::{DifficultyTotals, LeetlogError, ProblemMetadata, Result};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 3;

/// Default timeout in seconds for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("leetlog/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// MetadataSource
// ---------------------------------------------------------------------------

/// Anything that can resolve slugs to problem metadata.
pub trait MetadataSource {
    /// Look up a single problem by slug.
    fn question(&self, slug: &str) -> impl Future<Output = Result<ProblemMetadata>> + Send;

    /// Global problem counts per difficulty.
    fn difficulty_totals(&self) -> impl Future<Output = Result<DifficultyTotals>> + Send;
}

// ---------------------------------------------------------------------------
// Client options
// ---------------------------------------------------------------------------

/// Configuration for [`LeetCodeClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// GraphQL endpoint.
    pub endpoint: Url,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl ClientOptions {
    /// Options for `endpoint` with the default timeout.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            LeetlogError::config(format!("invalid API endpoint '{endpoint}': {e}"))
        })?;
        Ok(Self {
            endpoint,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

// ---------------------------------------------------------------------------
// LeetCodeClient
// ---------------------------------------------------------------------------

/// HTTP client for the problem API.
#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    client: Client,
    endpoint: Url,
}

impl LeetCodeClient {
    /// Build a client with the given options.
    pub fn new(opts: &ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| LeetlogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: opts.endpoint.clone(),
        })
    }

    /// POST a GraphQL body and return the raw response text.
    async fn post(&self, body: &serde_json::Value) -> Result<String> {
        let url = &self.endpoint;
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::REFERER, url.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| LeetlogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeetlogError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| LeetlogError::Network(format!("{url}: failed to read body: {e}")))
    }
}

impl MetadataSource for LeetCodeClient {
    #[instrument(skip(self))]
    async fn question(&self, slug: &str) -> Result<ProblemMetadata> {
        let body = self.post(&graphql::question_request(slug)).await?;
        let meta = graphql::parse_question(slug, &body)?;
        debug!(id = meta.frontend_id, title = %meta.title, "resolved problem");
        Ok(meta)
    }

    #[instrument(skip(self))]
    async fn difficulty_totals(&self) -> Result<DifficultyTotals> {
        let body = self.post(&graphql::counts_request()).await?;
        graphql::parse_counts(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leetlog_shared::Difficulty;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> LeetCodeClient {
        let opts = ClientOptions::new(&format!("{}/graphql", server.uri())).unwrap();
        LeetCodeClient::new(&opts).unwrap()
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let err = ClientOptions::new("not a url").unwrap_err();
        assert!(matches!(err, LeetlogError::Config { .. }));
    }

    #[tokio::test]
    async fn question_with_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "titleSlug": "two-sum" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":{"question":{"questionFrontendId":"1","title":"Two Sum","difficulty":"Easy"}}}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let meta = client.question("two-sum").await.unwrap();
        assert_eq!(meta.frontend_id, 1);
        assert_eq!(meta.title, "Two Sum");
        assert_eq!(meta.difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn unknown_slug() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"data":{"question":null}}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.question("does-not-exist").await.unwrap_err();
        assert!(matches!(err, LeetlogError::UnknownSlug(_)));
    }

    #[tokio::test]
    async fn http_error_is_network_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.question("two-sum").await.unwrap_err();
        assert!(matches!(err, LeetlogError::Network(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.difficulty_totals().await.unwrap_err();
        assert!(matches!(err, LeetlogError::Parse { .. }));
    }

    #[tokio::test]
    async fn totals_with_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(serde_json::json!({
                "operationName": "allQuestionsCount"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":{"allQuestionsCount":[{"difficulty":"All","count":60},{"difficulty":"Easy","count":20},{"difficulty":"Medium","count":30},{"difficulty":"Hard","count":10}]}}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let totals = client.difficulty_totals().await.unwrap();
        assert_eq!(totals.all, 60);
        assert_eq!(totals.by_difficulty.medium, 30);
    }
}
