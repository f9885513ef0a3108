//! HTTP client integration tests against a mock search server

use super::*;
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Mock search server for controlled testing scenarios
pub struct MockSearchServer {
    server: MockServer,
}

impl MockSearchServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn endpoint(&self, request_path: &str) -> Url {
        Url::parse(&format!("{}{}", self.url(), request_path)).unwrap()
    }

    pub async fn mock_hits(&self, request_path: &str, delay_ms: Option<u64>) {
        let mut template = ResponseTemplate::new(200)
            .set_body_string(r#"{"summary": {"numberOfHits": 3}}"#);
        if let Some(delay) = delay_ms {
            template = template.set_delay(Duration::from_millis(delay));
        }

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_error(&self, request_path: &str, status_code: u16) {
        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status_code).set_body_string("Error"))
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn test_get_success_reads_body() {
    let server = MockSearchServer::new().await;
    server.mock_hits("/corpus/hits", None).await;

    let client = NetworkClient::new().unwrap();
    let response = client.get(&server.endpoint("/corpus/hits")).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.is_success());
    assert!(response.body.contains("numberOfHits"));
}

#[tokio::test]
async fn test_elapsed_covers_server_delay() {
    let server = MockSearchServer::new().await;
    server.mock_hits("/slow/hits", Some(100)).await;

    let client = NetworkClient::new().unwrap();
    let response = client.get(&server.endpoint("/slow/hits")).await.unwrap();

    assert!(response.elapsed >= Duration::from_millis(100));
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockSearchServer::new().await;
    server.mock_error("/corpus/hits", 500).await;

    let client = NetworkClient::new().unwrap();
    let response = client.get(&server.endpoint("/corpus/hits")).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert!(!response.is_success());
    assert_eq!(response.body, "Error");
}

#[tokio::test]
async fn test_query_string_reaches_server() {
    let server = MockSearchServer::new().await;
    Mock::given(method("GET"))
        .and(path("/corpus/hits"))
        .and(query_param("patt", "\"cat\""))
        .and(query_param("group", "hit:word:i"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server.server)
        .await;

    let mut url = server.endpoint("/corpus/hits");
    url.query_pairs_mut()
        .append_pair("group", "hit:word:i")
        .append_pair("patt", "\"cat\"");

    let client = NetworkClient::new().unwrap();
    let response = client.get(&url).await.unwrap();
    assert_eq!(response.status_code, 200);
}

#[tokio::test]
async fn test_post_request() {
    let server = MockSearchServer::new().await;
    Mock::given(method("POST"))
        .and(path("/cache-clear"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server.server)
        .await;

    let client = NetworkClient::new().unwrap();
    let response = client.post(&server.endpoint("/cache-clear")).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockSearchServer::new().await;
    server.mock_hits("/hung/hits", Some(2_000)).await;

    let client = NetworkClient::with_timeout(Duration::from_millis(200)).unwrap();
    let result = client.get(&server.endpoint("/hung/hits")).await;

    assert!(matches!(result, Err(AppError::Network(_))));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Bind and drop a listener to get a port nobody is serving
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = Url::parse(&format!("http://127.0.0.1:{}/corpus/hits", port)).unwrap();

    let client = NetworkClient::new().unwrap();
    let error = client.get(&url).await.unwrap_err();
    assert_eq!(error.category(), "NETWORK");
    assert!(error.to_string().contains(&port.to_string()));
}
