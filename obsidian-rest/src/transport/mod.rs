//! HTTP transport seam
//!
//! The client talks to the Local REST API through the [`Transport`] trait so
//! that operations can be exercised against an in-memory stub. The production
//! implementation is [`HttpTransport`].

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Content type used for note bodies unless a request overrides it
pub const DEFAULT_CONTENT_TYPE: &str = "text/markdown";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A single request against the API, relative to the base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Encoded resource path, starting with `/`
    pub path: String,
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// Extra headers (auth and content type are added by the transport)
    pub headers: Vec<(String, String)>,
    /// Content type override for the body
    pub content_type: Option<String>,
    /// Accept header, for content negotiation
    pub accept: Option<String>,
    /// Request body
    pub body: Option<String>,
}

impl ApiRequest {
    /// Create a request with no body, query or extra headers
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            content_type: None,
            accept: None,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Look up an extra header by name (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Content type the transport will send with this request
    pub fn effective_content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Raw response from the API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure below the HTTP layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// DNS failure, refused or reset connection
    #[error("connection failed: {0}")]
    Connect(String),

    /// The configured timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Request could not be built or the body could not be read
    #[error("{0}")]
    Other(String),
}

/// Sends requests to the Local REST API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL requests are resolved against, e.g. `https://127.0.0.1:27124`
    fn base_url(&self) -> &str;

    /// Perform exactly one HTTP round trip
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
