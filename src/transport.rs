//! HTTP transport
//!
//! A thin executor over a pooled [`reqwest::Client`]. Every call to
//! [`Transport::request`] performs exactly one network round trip: no retry,
//! no authentication logic, no status interpretation.

use crate::types::FibConfig;
use crate::{FibError, Result};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::Method;
use reqwest::Client;
use serde_json::Value;

/// Options for a single HTTP request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// JSON request body
    pub json: Option<Value>,
    /// Form-encoded request body
    pub form: Option<Vec<(String, String)>>,
    /// HTTP basic credentials as (username, password)
    pub basic_auth: Option<(String, String)>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body
    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set a form-encoded body
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    /// Set HTTP basic credentials
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }
}

/// Uniform response returned by a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Body parsed as JSON when the content type says so
    pub json: Option<Value>,
    /// Raw response text
    pub text: String,
}

impl HttpResponse {
    /// Build a response, parsing the body when `content_type` indicates JSON
    pub fn new(status: u16, content_type: Option<&str>, text: String) -> Self {
        let json = content_type
            .filter(|ct| ct.contains("json"))
            .and_then(|_| serde_json::from_str(&text).ok());
        Self { status, json, text }
    }

    /// Whether the status is one the payment API treats as success
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// JSON body, parsing the raw text when the content type was not JSON.
    ///
    /// An empty body reads as `null`.
    pub fn json_body(&self) -> Result<Value> {
        if let Some(json) = &self.json {
            return Ok(json.clone());
        }
        if self.text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.text)?)
    }
}

/// Executes single HTTP requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one HTTP request
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport honouring the configured timeout
    pub fn new(config: &FibConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| FibError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client (e.g. one with a proxy configured)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse> {
        tracing::debug!("Sending {} request to: {}", method, url);

        let mut request = self.client.request(method, url);

        for (key, value) in &options.headers {
            request = request.header(key, value);
        }
        if let Some((username, password)) = &options.basic_auth {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(form) = &options.form {
            request = request.form(form);
        }
        if let Some(body) = &options.json {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;

        tracing::debug!("Received status {} from: {}", status, url);

        Ok(HttpResponse::new(status, content_type.as_deref(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{with_retry, RetryPolicy};
    use crate::NetworkErrorKind;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[test]
    fn test_response_parses_json_content_type() {
        let response = HttpResponse::new(
            200,
            Some("application/json; charset=utf-8"),
            r#"{"status":"PAID"}"#.to_string(),
        );
        assert_eq!(response.json, Some(json!({"status": "PAID"})));
        assert!(response.is_success());
    }

    #[test]
    fn test_response_keeps_text_for_other_content_types() {
        let response = HttpResponse::new(500, Some("text/plain"), "boom".to_string());
        assert_eq!(response.json, None);
        assert_eq!(response.text, "boom");
        assert!(!response.is_success());
        assert!(response.json_body().is_err());
    }

    #[test]
    fn test_empty_body_reads_as_null() {
        let response = HttpResponse::new(202, None, String::new());
        assert_eq!(response.json_body().unwrap(), Value::Null);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_request_sends_headers_and_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("x-test", "1")
            .match_body(Matcher::Json(json!({"a": 1})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let transport = HttpTransport::with_client(Client::new());
        let response = transport
            .request(
                Method::POST,
                &format!("{}/echo", server.url()),
                RequestOptions::new()
                    .with_header("x-test", "1")
                    .with_json(json!({"a": 1})),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
        assert_eq!(response.json, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_request_sends_form_and_basic_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .create_async()
            .await;

        let transport = HttpTransport::with_client(Client::new());
        let response = transport
            .request(
                Method::POST,
                &format!("{}/token", server.url()),
                RequestOptions::new()
                    .with_basic_auth("user", "pass")
                    .with_form(vec![(
                        "grant_type".to_string(),
                        "client_credentials".to_string(),
                    )]),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let transport = HttpTransport::with_client(Client::new());
        let response = transport
            .request(
                Method::GET,
                &format!("{}/missing", server.url()),
                RequestOptions::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.text, "not found");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let transport = HttpTransport::with_client(Client::new());
        let err = transport
            .request(Method::GET, "http://127.0.0.1:1/unreachable", RequestOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FibError::Network {
                kind: NetworkErrorKind::Connect,
                ..
            }
        ));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_closed_before_response_is_retried() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let transport = HttpTransport::with_client(Client::new());
        let url = format!("http://{}/payments", addr);
        let policy = RetryPolicy::new().with_initial_delay(Duration::from_millis(10));
        let err = with_retry(&policy, || {
            transport.request(
                Method::POST,
                &url,
                RequestOptions::new().with_json(json!({"amount": 1000})),
            )
        })
        .await
        .unwrap_err();

        match err {
            FibError::RetryExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                match *source {
                    FibError::Network { kind, ref message } => {
                        assert_eq!(kind, NetworkErrorKind::Connect);
                        // The underlying cause is kept after reqwest's summary
                        assert!(message.contains("error sending request: "));
                        assert!(!message.contains(&addr.to_string()));
                    }
                    ref other => panic!("unexpected source: {:?}", other),
                }
            }
            other => panic!("expected RetryExhausted, got {:?}", other),
        }
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }
}
