//! Inventory API wire types and the aggregate built from them

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, ScanError};

// Wire schema of GET /v1/computers

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryPage {
    pub data: Vec<ComputerEntry>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageMetadata {
    pub results: ResultsInfo,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultsInfo {
    pub total: u64,
    #[serde(default)]
    pub index: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputerEntry {
    #[serde(default)]
    pub connector_guid: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub last_seen: String,
    // null and absent both mean "no interface data" for this connector
    #[serde(default)]
    pub network_addresses: Option<Vec<NetworkAddress>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkAddress {
    #[serde(default)]
    pub mac: Option<String>,
    // Decoded but not used by the scan
    #[serde(default)]
    #[allow(dead_code)]
    pub ip: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub ipv6: Option<String>,
}

impl InventoryPage {
    /// Decode a raw response body; `url` is only used for diagnostics
    pub fn from_value(url: &str, value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ScanError::malformed(url, e))
    }

    pub fn next_link(&self) -> Option<&str> {
        self.metadata.links.next.as_deref()
    }
}

/// Everything observed for one hostname during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    /// One entry per (connector, interface) observation; repeats are the collision signal
    pub macs: Vec<String>,
    #[serde(rename = "mac_guids")]
    pub mac_to_guids: BTreeMap<String, BTreeSet<String>>,
    pub guid_last_seen: BTreeMap<String, String>,
}

pub type HostsMap = BTreeMap<String, HostRecord>;

/// A (hostname, guid) pair implicated in a MAC collision.
///
/// Field order drives the derived ordering: hostname, then guid, then last_seen.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuplicateFinding {
    pub hostname: String,
    pub guid: String,
    pub last_seen: String,
}

impl DuplicateFinding {
    pub fn new(
        hostname: impl Into<String>,
        guid: impl Into<String>,
        last_seen: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            guid: guid.into(),
            last_seen: last_seen.into(),
        }
    }
}

/// hostname -> (guid -> last_seen), both levels in ascending key order
pub type DuplicateReport = BTreeMap<String, BTreeMap<String, String>>;
