//! reqwest-backed transport

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::config::ConnectionProfile;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Transport talking to a live Local REST API instance
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build the underlying HTTP client from a connection profile
    pub fn new(profile: &ConnectionProfile) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(profile.timeout)
            // The plugin serves a self-signed certificate by default
            .danger_accept_invalid_certs(!profile.verify_ssl)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: profile.base_url(),
            api_key: profile.api_key.clone(),
        })
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, request.effective_content_type());

        if let Some(accept) = &request.accept {
            builder = builder.header(ACCEPT, accept);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        tracing::debug!("{} {} -> {}", request.method, url, status);

        Ok(ApiResponse { status, body })
    }
}
