//! Integration tests for Tavily MCP
//!
//! These tests run the dispatcher against a mock Tavily HTTP API.

use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use tavily_mcp::mcp::{Dispatcher, McpServer};
use tavily_mcp::models::{FailureKind, ToolInvocationRequest};
use tavily_mcp::provider::TavilyProvider;
use tavily_mcp::utils::HttpClient;

const API_KEY: &str = "tvly-integration-test";

fn dispatcher_for(server: &mockito::ServerGuard) -> Dispatcher {
    let provider = TavilyProvider::with_base_url(API_KEY, server.url(), HttpClient::new());
    Dispatcher::with_provider(Arc::new(provider))
}

#[tokio::test]
async fn test_search_with_defaults() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
        .match_body(Matcher::PartialJson(json!({
            "query": "rust ownership model",
            "search_depth": "basic",
            "max_results": 10,
            "topic": "general",
            "include_answer": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "query": "rust ownership model",
                "answer": null,
                "images": [],
                "results": [{
                    "title": "Understanding Ownership",
                    "url": "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
                    "content": "Ownership is Rust's most unique feature",
                    "score": 0.98
                }],
                "response_time": 0.87
            })
            .to_string(),
        )
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server);
    let response = dispatcher
        .handle(ToolInvocationRequest::new(
            "1",
            "search",
            json!({"query": "rust ownership model"}),
        ))
        .await;

    assert_eq!(response.request_id, "1");
    let payload = response.result.into_result().unwrap();
    assert_eq!(payload["results"].as_array().unwrap().len(), 1);
    assert_eq!(payload["results"][0]["title"], "Understanding Ownership");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_extract_missing_urls_makes_no_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server);
    let failure = dispatcher
        .dispatch("2", "extract", &json!({}))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::InvalidArguments);
    assert!(failure.message.contains("urls"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_map_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/map")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": {"error": "Unauthorized: missing or invalid API key."}}"#)
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server);
    let failure = dispatcher
        .dispatch("3", "map", &json!({"url": "https://example.com"}))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::ProviderError);
    assert!(failure.message.contains("401"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_identical_searches_hit_provider_twice() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"query": "q", "results": [], "response_time": 0.1}"#)
        .expect(2)
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server);
    let args = json!({"query": "q"});
    let first = dispatcher.dispatch("a", "search", &args).await;
    let second = dispatcher.dispatch("b", "search", &args).await;

    assert!(first.is_success());
    assert!(second.is_success());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_crawl_forwards_explicit_values() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/crawl")
        .match_body(Matcher::Json(json!({
            "url": "https://docs.example.com",
            "max_depth": 2,
            "max_breadth": 20,
            "limit": 50,
            "instructions": "API reference only",
            "select_paths": [],
            "select_domains": [],
            "exclude_paths": [],
            "exclude_domains": [],
            "allow_external": false,
            "categories": ["Documentation"],
            "extract_depth": "advanced",
            "format": "markdown"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"base_url": "https://docs.example.com", "results": [{"url": "https://docs.example.com/api", "raw_content": "API"}], "response_time": 3.2}"#,
        )
        .create_async()
        .await;

    let dispatcher = dispatcher_for(&server);
    let payload = dispatcher
        .dispatch(
            "4",
            "crawl",
            &json!({
                "url": "https://docs.example.com",
                "max_depth": 2,
                "instructions": "API reference only",
                "categories": ["Documentation"],
                "extract_depth": "advanced"
            }),
        )
        .await
        .into_result()
        .unwrap();

    assert_eq!(payload["base_url"], "https://docs.example.com");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let provider =
        TavilyProvider::with_base_url(API_KEY, "http://127.0.0.1:9", HttpClient::new());
    let dispatcher = Dispatcher::with_provider(Arc::new(provider));

    let result = dispatcher
        .dispatch("5", "extract", &json!({"urls": ["https://example.com"]}))
        .await;
    assert_eq!(result.failure_kind(), Some(FailureKind::TransportError));
}

#[tokio::test]
async fn test_server_shares_dispatcher_registry() {
    let server = mockito::Server::new_async().await;
    let mcp = McpServer::new(dispatcher_for(&server));
    let names: Vec<&str> = mcp
        .dispatcher()
        .registry()
        .list()
        .iter()
        .map(|t| t.name())
        .collect();
    assert_eq!(names, vec!["search", "extract", "map", "crawl"]);
}
