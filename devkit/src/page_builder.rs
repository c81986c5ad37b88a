/*!
Builders for `/v1/computers` listings

Produces JSON shaped like the real API:
`{"data": [...], "metadata": {"results": {...}, "links": {...}}}`
*/

use serde_json::{json, Map, Value};

/// One computer entry with a `network_addresses` list (one interface per MAC)
pub fn computer_entry<S: Into<String>>(guid: S, hostname: S, last_seen: S, macs: &[&str]) -> Value {
    let addresses: Vec<Value> = macs
        .iter()
        .enumerate()
        .map(|(i, mac)| {
            json!({
                "mac": mac,
                "ip": format!("10.0.0.{}", i + 1),
                "ipv6": format!("fe80::{}", i + 1)
            })
        })
        .collect();

    json!({
        "connector_guid": guid.into(),
        "hostname": hostname.into(),
        "last_seen": last_seen.into(),
        "network_addresses": addresses
    })
}

/// Builds one page of the listing
#[derive(Debug, Clone, Default)]
pub struct InventoryPageBuilder {
    entries: Vec<Value>,
    total: Option<u64>,
    index: Option<u64>,
    next: Option<String>,
}

impl InventoryPageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn computer<S: Into<String>>(self, guid: S, hostname: S, last_seen: S, macs: &[&str]) -> Self {
        self.entry(computer_entry(guid, hostname, last_seen, macs))
    }

    /// Entry stamped with the current time as `last_seen`
    pub fn computer_seen_now<S: Into<String>>(self, guid: S, hostname: S, macs: &[&str]) -> Self {
        let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        self.entry(computer_entry(guid.into(), hostname.into(), now, macs))
    }

    /// Entry with no `network_addresses` key at all
    pub fn computer_without_addresses<S: Into<String>>(self, guid: S, hostname: S, last_seen: S) -> Self {
        self.entry(json!({
            "connector_guid": guid.into(),
            "hostname": hostname.into(),
            "last_seen": last_seen.into()
        }))
    }

    /// Raw entry, for shapes the helpers don't cover
    pub fn entry(mut self, entry: Value) -> Self {
        self.entries.push(entry);
        self
    }

    /// Defaults to the number of entries on this page
    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn next<S: Into<String>>(mut self, url: S) -> Self {
        self.next = Some(url.into());
        self
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn build(&self) -> Value {
        let mut results = Map::new();
        results.insert(
            "total".into(),
            json!(self.total.unwrap_or(self.entries.len() as u64)),
        );
        if let Some(index) = self.index {
            results.insert("index".into(), json!(index));
        }

        let mut links = Map::new();
        if let Some(next) = &self.next {
            links.insert("next".into(), json!(next));
        }

        json!({
            "data": self.entries,
            "metadata": {
                "results": Value::Object(results),
                "links": Value::Object(links)
            }
        })
    }
}

/// URL of page `n` (0-based) of a chain starting at `start_url`
pub fn chain_url(start_url: &str, n: usize) -> String {
    if n == 0 {
        return start_url.to_string();
    }
    let sep = if start_url.contains('?') { '&' } else { '?' };
    format!("{start_url}{sep}offset={n}")
}

/// Links consecutive pages together and fills in `total`/`index` like the API does
pub fn link_pages(start_url: &str, pages: Vec<InventoryPageBuilder>) -> Vec<(String, Value)> {
    let total: u64 = pages.iter().map(|p| p.entry_count() as u64).sum();
    let count = pages.len();

    pages
        .into_iter()
        .enumerate()
        .map(|(n, page)| {
            let mut page = if page.total.is_none() { page.total(total) } else { page };
            if n > 0 && page.index.is_none() {
                page = page.index(n as u64);
            }
            if n + 1 < count {
                page = page.next(chain_url(start_url, n + 1));
            }
            (chain_url(start_url, n), page.build())
        })
        .collect()
}
