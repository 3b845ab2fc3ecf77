//! Tavily provider implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::{Arguments, Provider, ProviderError};
use crate::models::ToolKind;
use crate::utils::HttpClient;

/// Default base URL of the Tavily REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.tavily.com";

/// Tavily research provider
///
/// Holds the API credential and a pooled HTTP client. The credential is
/// fixed at construction and shared read-only by all invocations.
#[derive(Clone)]
pub struct TavilyProvider {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for TavilyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TavilyProvider {
    /// Create a provider against the public Tavily API
    pub fn new(api_key: impl Into<String>, http: HttpClient) -> Self {
        Self::with_base_url(api_key, DEFAULT_API_BASE_URL, http)
    }

    /// Create a provider against a custom base URL (proxies, tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        http: HttpClient,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, tool: ToolKind) -> String {
        format!("{}/{}", self.base_url, tool.endpoint())
    }

    /// Build the JSON request body for a tool call
    fn request_body(tool: ToolKind, mut arguments: Arguments) -> Value {
        // Country boosting is only supported for general search
        if tool == ToolKind::Search
            && arguments.get("country").is_some_and(|c| !c.is_null())
        {
            arguments.insert("topic".to_string(), Value::String("general".to_string()));
        }
        Value::Object(arguments)
    }

    /// Turn a non-success response into a provider error message
    fn rejection(status: StatusCode, body: &str) -> ProviderError {
        let detail = match status {
            StatusCode::UNAUTHORIZED => "Invalid API key".to_string(),
            StatusCode::TOO_MANY_REQUESTS => "Usage limit exceeded".to_string(),
            _ => extract_error_text(body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        };
        ProviderError::Rejected(format!("Tavily API returned HTTP {}: {}", status.as_u16(), detail))
    }
}

/// Pull a human-readable message out of a provider error body
fn extract_error_text(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let candidates = [
        value.pointer("/detail/error"),
        value.get("detail"),
        value.get("error"),
        value.get("message"),
    ];
    let found = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string));
    found.or_else(|| Some(trimmed.to_string()))
}

#[async_trait]
impl Provider for TavilyProvider {
    fn name(&self) -> &str {
        "Tavily"
    }

    async fn invoke(&self, tool: ToolKind, arguments: Arguments) -> Result<Value, ProviderError> {
        let url = self.endpoint_url(tool);
        let body = Self::request_body(tool, arguments);

        tracing::debug!(tool = %tool, url = %url, "Calling Tavily");

        let response = self
            .http
            .client()
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(tool = %tool, status = status.as_u16(), "Tavily rejected request");
            return Err(Self::rejection(status, &text));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ProviderError::Transport(format!("Failed to parse Tavily response as JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(server: &mockito::ServerGuard) -> TavilyProvider {
        TavilyProvider::with_base_url("tvly-test", server.url(), HttpClient::new())
    }

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider = TavilyProvider::with_base_url("k", "http://localhost:1/", HttpClient::new());
        assert_eq!(provider.base_url(), "http://localhost:1");
        assert_eq!(provider.endpoint_url(ToolKind::Map), "http://localhost:1/map");
        assert_eq!(provider.name(), "Tavily");
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = TavilyProvider::new("tvly-secret", HttpClient::new());
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("tvly-secret"));
    }

    #[test]
    fn test_country_forces_general_topic() {
        let body = TavilyProvider::request_body(
            ToolKind::Search,
            args(json!({"query": "q", "topic": "news", "country": "france"})),
        );
        assert_eq!(body["topic"], "general");

        let body = TavilyProvider::request_body(
            ToolKind::Search,
            args(json!({"query": "q", "topic": "news", "country": null})),
        );
        assert_eq!(body["topic"], "news");
    }

    #[test]
    fn test_extract_error_text() {
        assert_eq!(
            extract_error_text(r#"{"detail": {"error": "Invalid URL"}}"#),
            Some("Invalid URL".to_string())
        );
        assert_eq!(
            extract_error_text(r#"{"detail": "Bad request"}"#),
            Some("Bad request".to_string())
        );
        assert_eq!(extract_error_text("plain failure"), Some("plain failure".to_string()));
        assert_eq!(extract_error_text("  "), None);
    }

    #[tokio::test]
    async fn test_invoke_passes_payload_through() {
        let mut server = mockito::Server::new_async().await;
        let payload = json!({
            "query": "rust",
            "results": [{"title": "Rust", "url": "https://rust-lang.org", "content": "c", "score": 0.9}],
            "response_time": 1.2,
            "some_future_field": {"nested": true}
        });
        let mock = server
            .mock("POST", "/search")
            .match_header("authorization", "Bearer tvly-test")
            .match_body(Matcher::PartialJson(json!({"query": "rust"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .create_async()
            .await;

        let result = provider(&server)
            .invoke(ToolKind::Search, args(json!({"query": "rust"})))
            .await
            .unwrap();

        assert_eq!(result, payload);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_invoke_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/extract")
            .with_status(401)
            .with_body(r#"{"detail": {"error": "Unauthorized: missing or invalid API key."}}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .invoke(ToolKind::Extract, args(json!({"urls": ["https://example.com"]})))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::models::FailureKind::ProviderError);
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_invoke_reports_provider_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/crawl")
            .with_status(400)
            .with_body(r#"{"detail": {"error": "max_depth must be at most 5"}}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .invoke(ToolKind::Crawl, args(json!({"url": "https://example.com"})))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProviderError::Rejected(
                "Tavily API returned HTTP 400: max_depth must be at most 5".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_invoke_non_json_body_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/map")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = provider(&server)
            .invoke(ToolKind::Map, args(json!({"url": "https://example.com"})))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invoke_unreachable_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let provider =
            TavilyProvider::with_base_url("k", "http://127.0.0.1:9", HttpClient::new());
        let err = provider
            .invoke(ToolKind::Search, args(json!({"query": "q"})))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::models::FailureKind::TransportError);
    }
}
