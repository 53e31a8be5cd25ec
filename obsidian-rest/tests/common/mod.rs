//! In-memory stand-in for the Local REST API

#![allow(dead_code)]

use async_trait::async_trait;
use obsidian_rest::{ApiRequest, ApiResponse, Method, Transport, TransportError, VaultClient};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://127.0.0.1:27124";

/// Forced outcome for every request
#[derive(Debug, Clone)]
pub enum Failure {
    Status(u16, String),
    Refused,
}

/// A vault held in memory, keyed by vault-relative path
#[derive(Default)]
pub struct FakeVault {
    notes: Mutex<BTreeMap<String, String>>,
    active: Mutex<Option<String>>,
    requests: Mutex<Vec<ApiRequest>>,
    failure: Mutex<Option<Failure>>,
}

impl FakeVault {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_notes(notes: &[(&str, &str)]) -> Arc<Self> {
        let vault = Self::new();
        for (path, content) in notes {
            vault.insert(path, content);
        }
        vault
    }

    pub fn client(self: &Arc<Self>) -> VaultClient {
        VaultClient::new(self.clone())
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.notes
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub fn note(&self, path: &str) -> Option<String> {
        self.notes.lock().unwrap().get(path).cloned()
    }

    pub fn set_active(&self, path: &str) {
        *self.active.lock().unwrap() = Some(path.to_string());
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, request: &ApiRequest) -> ApiResponse {
        let path = urlencoding::decode(&request.path)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| request.path.clone());

        if path == "/active/" {
            let active = self.active.lock().unwrap().clone();
            return match active {
                Some(target) => self.note_request(request, &target),
                None => ApiResponse::new(
                    405,
                    json!({"message": "No file is currently open", "errorCode": 40510})
                        .to_string(),
                ),
            };
        }

        if let Some(rest) = path.strip_prefix("/vault/") {
            if rest.is_empty() || rest.ends_with('/') {
                return self.listing(rest);
            }
            return self.note_request(request, rest);
        }

        if path == "/search/simple/" {
            return self.simple_search(request);
        }

        if let Some(rest) = path.strip_prefix("/open/") {
            return match self.note(rest) {
                Some(_) => ApiResponse::new(200, ""),
                None => ApiResponse::new(404, ""),
            };
        }

        ApiResponse::new(400, json!({"message": "unsupported"}).to_string())
    }

    fn note_request(&self, request: &ApiRequest, path: &str) -> ApiResponse {
        let mut notes = self.notes.lock().unwrap();
        match request.method {
            Method::Get => match notes.get(path) {
                Some(content) => ApiResponse::new(200, content.clone()),
                None => ApiResponse::new(404, ""),
            },
            Method::Put => {
                notes.insert(path.to_string(), request.body.clone().unwrap_or_default());
                ApiResponse::new(204, "")
            }
            Method::Post => match notes.get_mut(path) {
                Some(content) => {
                    content.push_str(request.body.as_deref().unwrap_or_default());
                    ApiResponse::new(204, "")
                }
                None => ApiResponse::new(404, ""),
            },
            Method::Delete => match notes.remove(path) {
                Some(_) => ApiResponse::new(204, ""),
                None => ApiResponse::new(404, ""),
            },
            Method::Patch => match notes.contains_key(path) {
                true => ApiResponse::new(200, ""),
                false => ApiResponse::new(404, ""),
            },
        }
    }

    fn listing(&self, dir: &str) -> ApiResponse {
        let notes = self.notes.lock().unwrap();
        let files: Vec<&str> = notes
            .keys()
            .filter_map(|k| k.strip_prefix(dir))
            .collect();
        if files.is_empty() && !dir.is_empty() {
            return ApiResponse::new(404, "");
        }
        ApiResponse::new(200, json!({ "files": files }).to_string())
    }

    fn simple_search(&self, request: &ApiRequest) -> ApiResponse {
        let query = request
            .query
            .iter()
            .find(|(k, _)| k == "query")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let notes = self.notes.lock().unwrap();
        let hits: Vec<_> = notes
            .iter()
            .filter(|(path, content)| match query.strip_prefix("file:") {
                Some(name) => path.ends_with(name),
                None => content.contains(&query),
            })
            .map(|(path, _)| json!({ "filename": path, "score": 1.0, "matches": [] }))
            .collect();
        ApiResponse::new(200, serde_json::Value::Array(hits).to_string())
    }
}

#[async_trait]
impl Transport for FakeVault {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let failure = self.failure.lock().unwrap().clone();
        match failure {
            Some(Failure::Refused) => Err(TransportError::Connect("connection refused".into())),
            Some(Failure::Status(status, body)) => Ok(ApiResponse::new(status, body)),
            None => Ok(self.respond(&request)),
        }
    }
}
