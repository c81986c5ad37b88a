//! Page fetching and pagination over the computers listing
//!
//! - `PageSource` abstracts "GET a URL, decode JSON"
//! - `HttpPageSource` is the reqwest implementation with basic auth
//! - `Paginator` follows `metadata.links.next` until it disappears

use crate::config::ApiConfig;
use crate::error::{Result, ScanError};
use crate::models::InventoryPage;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info};

pub trait PageSource {
    /// GET `url` and return the decoded JSON body
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

pub struct HttpPageSource {
    client: reqwest::Client,
    client_id: String,
    api_key: String,
}

impl HttpPageSource {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("dupscan/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| ScanError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            client_id: api.client_id.clone(),
            api_key: api.api_key.clone(),
        })
    }
}

impl PageSource for HttpPageSource {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .basic_auth(&self.client_id, Some(&self.api_key))
            .send()
            .await
            .map_err(|e| ScanError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::transport(url, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScanError::transport(url, e))?;

        serde_json::from_slice(&body).map_err(|e| ScanError::malformed(url, e))
    }
}

/// Sequential walk over every page of a listing
pub struct Paginator<'a, S: PageSource> {
    source: &'a S,
    next_url: Option<String>,
    max_pages: Option<u32>,
    pages_fetched: u32,
    total_advertised: Option<u64>,
}

impl<'a, S: PageSource> Paginator<'a, S> {
    pub fn new(source: &'a S, start_url: impl Into<String>, max_pages: Option<u32>) -> Self {
        Self {
            source,
            next_url: Some(start_url.into()),
            max_pages,
            pages_fetched: 0,
            total_advertised: None,
        }
    }

    /// Fetch the next page, or `None` once the API stops advertising one.
    ///
    /// Hitting `max_pages` while a next link is still pending is an error.
    pub async fn next_page(&mut self) -> Result<Option<InventoryPage>> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        if let Some(limit) = self.max_pages {
            if self.pages_fetched >= limit {
                return Err(ScanError::PageLimit { limit });
            }
        }

        let raw = self.source.get_json(&url).await?;
        let page = InventoryPage::from_value(&url, raw)?;
        self.pages_fetched += 1;

        if self.total_advertised.is_none() {
            self.total_advertised = Some(page.metadata.results.total);
        } else {
            let index = page
                .metadata
                .results
                .index
                .unwrap_or(u64::from(self.pages_fetched));
            info!("Processing index: {}", index);
        }

        self.next_url = page.next_link().map(str::to_string);
        debug!(
            "page {} carried {} entries, next: {:?}",
            self.pages_fetched,
            page.data.len(),
            self.next_url
        );
        Ok(Some(page))
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// `metadata.results.total` as announced by the first page
    pub fn total_advertised(&self) -> Option<u64> {
        self.total_advertised
    }
}

#[cfg(test)]
mod mock_source {
    use super::*;
    use dupscan_devkit::{MockInventoryApi, MockResponse};

    impl PageSource for MockInventoryApi {
        async fn get_json(&self, url: &str) -> Result<Value> {
            match self.serve(url) {
                MockResponse::Json(value) => Ok(value),
                MockResponse::Body(body) => {
                    serde_json::from_str(&body).map_err(|e| ScanError::malformed(url, e))
                }
                MockResponse::Status(code) => {
                    Err(ScanError::transport(url, format!("HTTP {code}")))
                }
                MockResponse::Failure(message) => Err(ScanError::transport(url, message)),
            }
        }
    }
}
