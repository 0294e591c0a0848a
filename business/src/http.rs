//! Platform-abstracted HTTP client with Send-safe futures.
//!
//! The backend keeps the login session in a cookie, so every request of one front end must
//! go through the same [`HttpClient`]:
//! - On **native**: a shared `reqwest::Client` with an in-memory cookie jar.
//! - On **WASM**: the browser owns the cookies; requests are sent with credentials and run
//!   on the JS thread via `wasm_bindgen_futures::spawn_local`, with results sent back through
//!   a `flume` channel so the returned future stays `Send`.
//!
//! Unsafe methods echo the `csrftoken` cookie in the `X-CSRFToken` header when one is set.

use std::any::Any;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

use log::error;
use sadtime_states::{SnapshotClone, State};
use thiserror::Error;

/// Cookie the backend uses for its CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Header the backend expects the CSRF token in.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    fn is_safe(self) -> bool {
        matches!(self, Self::Get)
    }
}

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Clone, Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Session-carrying HTTP client, registered once as a state and cloned into commands.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    #[cfg(not(target_arch = "wasm32"))]
    jar: Arc<reqwest::cookie::Jar>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        let jar = Arc::new(reqwest::cookie::Jar::default());
        let inner = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .unwrap_or_else(|err| {
                error!("HttpClient: failed to build client with cookie jar: {err}");
                reqwest::Client::new()
            });
        Self { inner, jar }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.clone(), Method::Post, url)
    }

    /// The CSRF token the backend handed out for `url`, if any.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn csrf_token(&self, url: &str) -> Option<String> {
        use reqwest::cookie::CookieStore as _;

        let url = reqwest::Url::parse(url).ok()?;
        let header = self.jar.cookies(&url)?;
        let cookies = header.to_str().ok()?;
        cookie_value(cookies, CSRF_COOKIE).map(str::to_owned)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn csrf_token(&self, _url: &str) -> Option<String> {
        use wasm_bindgen::JsCast as _;

        let document = web_sys::window()?.document()?;
        let cookies = document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()?;
        cookie_value(&cookies, CSRF_COOKIE).map(str::to_owned)
    }
}

impl SnapshotClone for HttpClient {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for HttpClient {}

/// Finds `name` in a `Cookie` header value (`a=1; b=2`).
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: HttpClient,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(client: HttpClient, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(json_bytes);
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        Ok(self)
    }

    fn with_csrf(mut self) -> Self {
        if !self.method.is_safe()
            && !self.headers.contains_key(CSRF_HEADER)
            && let Some(token) = self.client.csrf_token(&self.url)
        {
            self.headers.insert(CSRF_HEADER.to_string(), token);
        }
        self
    }

    /// Send the request and return a Send-safe future.
    pub async fn send(self) -> HttpResult<Response> {
        let request = self.with_csrf();

        #[cfg(not(target_arch = "wasm32"))]
        {
            request.send_native().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            request.send_wasm().await
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn send_native(self) -> HttpResult<Response> {
        let Self {
            client,
            method,
            url,
            headers,
            body,
        } = self;
        execute(client.inner, method, url, headers, body).await
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_wasm(self) -> HttpResult<Response> {
        let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);

        let Self {
            client,
            method,
            url,
            headers,
            body,
        } = self;

        // This closure is NOT Send, but spawn_local doesn't require Send
        wasm_bindgen_futures::spawn_local(async move {
            let result = execute(client.inner, method, url, headers, body).await;
            // Receiver may already be gone if the command was dropped
            let _ = tx.send_async(result).await;
        });

        rx.recv_async()
            .await
            .map_err(|_| HttpError::new("Request cancelled"))?
    }
}

async fn execute(
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
) -> HttpResult<Response> {
    let mut request = match method {
        Method::Get => client.get(&url),
        Method::Post => client.post(&url),
    };

    #[cfg(target_arch = "wasm32")]
    {
        request = request.fetch_credentials_include();
    }

    for (name, value) in &headers {
        request = request.header(name, value);
    }

    if let Some(body) = body {
        request = request.body(body);
    }

    let response = request
        .send()
        .await
        .map_err(|e| HttpError::new(e.to_string()))?;

    // Extract status and headers before consuming the response
    let status = response.status().as_u16();
    let mut response_headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            response_headers.insert(name.as_str().to_lowercase(), v.to_string());
        }
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| HttpError::new(e.to_string()))?
        .to_vec();

    Ok(Response {
        status,
        headers: response_headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &[u8]) -> Response {
        Response {
            status,
            headers: HashMap::new(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_response_is_success() {
        assert!(response(200, b"").is_success());
        assert!(response(204, b"").is_success());
        assert!(!response(401, b"").is_success());
        assert!(!response(500, b"").is_success());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = Response {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Body {
            error: String,
        }

        let parsed: Body = response(401, br#"{"error": "Invalid credentials"}"#)
            .json()
            .expect("body should parse");
        assert_eq!(
            parsed,
            Body {
                error: "Invalid credentials".to_string()
            }
        );
    }

    #[test]
    fn test_cookie_value() {
        let header = "sessionid=abc; csrftoken=tok123";
        assert_eq!(cookie_value(header, "csrftoken"), Some("tok123"));
        assert_eq!(cookie_value(header, "sessionid"), Some("abc"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
    }

    #[test]
    fn test_request_builder_json_sets_content_type() {
        let client = HttpClient::new();
        let builder = client
            .post("http://localhost/api/auth/login/")
            .json(&serde_json::json!({ "username": "analyst" }))
            .expect("json body should serialize");

        assert_eq!(
            builder.headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert!(builder.body.is_some());
    }

    #[test]
    fn test_get_requests_never_carry_csrf() {
        let client = HttpClient::new();
        let builder = client.get("http://localhost/api/auth/me/").with_csrf();
        assert!(!builder.headers.contains_key(CSRF_HEADER));
    }
}
