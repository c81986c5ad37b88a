/*!
Mock inventory API for development without network access

Serves canned responses keyed by exact URL and records every request,
so tests can assert on pagination order.
*/

use crate::page_builder::{link_pages, InventoryPageBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// What the mock answers for one URL
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// 200 with a JSON body
    Json(Value),
    /// 200 with a raw (possibly invalid) body
    Body(String),
    /// Non-success HTTP status
    Status(u16),
    /// Connection-level failure
    Failure(String),
}

#[derive(Default)]
pub struct MockInventoryApi {
    responses: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockInventoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response<S: Into<String>>(self, url: S, response: MockResponse) -> Self {
        self.register(url, response);
        self
    }

    pub fn with_page<S: Into<String>>(self, url: S, page: Value) -> Self {
        self.with_response(url, MockResponse::Json(page))
    }

    pub fn with_body<S: Into<String>, B: Into<String>>(self, url: S, body: B) -> Self {
        self.with_response(url, MockResponse::Body(body.into()))
    }

    pub fn with_status<S: Into<String>>(self, url: S, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status))
    }

    pub fn with_failure<S: Into<String>, M: Into<String>>(self, url: S, message: M) -> Self {
        self.with_response(url, MockResponse::Failure(message.into()))
    }

    /// Register a linked chain of pages, the first one at `start_url`
    pub fn with_chain(self, start_url: &str, pages: Vec<InventoryPageBuilder>) -> Self {
        for (url, page) in link_pages(start_url, pages) {
            self.register(url, MockResponse::Json(page));
        }
        self
    }

    pub fn register<S: Into<String>>(&self, url: S, response: MockResponse) {
        let url = url.into();
        log::debug!("[MOCK] registered {}", url);
        self.responses
            .lock()
            .unwrap()
            .insert(url, response);
    }

    /// Answer a request; unknown URLs get a 404
    pub fn serve(&self, url: &str) -> MockResponse {
        self.requests.lock().unwrap().push(url.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(MockResponse::Status(404));
        log::info!("📥 [MOCK] GET {} -> {}", url, response.describe());
        response
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.responses.lock().unwrap().clear();
        self.requests.lock().unwrap().clear();
    }
}

impl MockResponse {
    fn describe(&self) -> String {
        match self {
            MockResponse::Json(_) => "200 json".to_string(),
            MockResponse::Body(body) => format!("200 raw ({} bytes)", body.len()),
            MockResponse::Status(code) => code.to_string(),
            MockResponse::Failure(message) => format!("failure: {message}"),
        }
    }
}
