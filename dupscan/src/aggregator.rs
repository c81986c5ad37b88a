//! Folds inventory pages into per-hostname network identity records

use crate::analyzer;
use crate::models::{ComputerEntry, DuplicateFinding, HostRecord, HostsMap, InventoryPage};
use std::collections::BTreeSet;
use tracing::debug;

/// Owns the hostname -> `HostRecord` state for one run
#[derive(Debug, Default)]
pub struct InventoryAggregator {
    hosts: HostsMap,
    entries_seen: usize,
    entries_skipped: usize,
}

impl InventoryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, page: &InventoryPage) {
        for entry in &page.data {
            self.ingest_entry(entry);
        }
    }

    /// Entries without `network_addresses` leave no trace in the aggregate.
    pub fn ingest_entry(&mut self, entry: &ComputerEntry) {
        self.entries_seen += 1;
        let Some(addresses) = entry.network_addresses.as_ref() else {
            self.entries_skipped += 1;
            debug!(
                "skipping {} ({}): no network_addresses",
                entry.connector_guid, entry.hostname
            );
            return;
        };

        let record = self.hosts.entry(entry.hostname.clone()).or_default();

        // Last write wins, even if an earlier page carried a newer timestamp
        record
            .guid_last_seen
            .insert(entry.connector_guid.clone(), entry.last_seen.clone());

        for mac in addresses.iter().filter_map(|a| a.mac.as_ref()) {
            record.macs.push(mac.clone());
            record
                .mac_to_guids
                .entry(mac.clone())
                .or_default()
                .insert(entry.connector_guid.clone());
        }
    }

    #[cfg(test)]
    pub fn host(&self, hostname: &str) -> Option<&HostRecord> {
        self.hosts.get(hostname)
    }

    #[cfg(test)]
    pub fn hosts(&self) -> &HostsMap {
        &self.hosts
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn entries_seen(&self) -> usize {
        self.entries_seen
    }

    pub fn entries_skipped(&self) -> usize {
        self.entries_skipped
    }

    pub fn findings(&self) -> BTreeSet<DuplicateFinding> {
        analyzer::find_duplicates(&self.hosts)
    }

    pub fn into_hosts(self) -> HostsMap {
        self.hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dupscan_devkit::InventoryPageBuilder;
    use serde_json::json;

    fn page(builder: InventoryPageBuilder) -> InventoryPage {
        InventoryPage::from_value("test", builder.build()).unwrap()
    }

    #[test]
    fn test_first_entry_creates_host_record() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(
            InventoryPageBuilder::new().computer("G1", "H1", "2023-01-01", &["AA", "BB"]),
        ));

        let host = agg.host("H1").unwrap();
        assert_eq!(host.macs, vec!["AA", "BB"]);
        assert_eq!(host.mac_to_guids["AA"], BTreeSet::from(["G1".to_string()]));
        assert_eq!(host.guid_last_seen["G1"], "2023-01-01");
        assert_eq!(agg.host_count(), 1);
    }

    #[test]
    fn test_entries_without_network_addresses_are_ignored() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(
            InventoryPageBuilder::new()
                .computer_without_addresses("G1", "H1", "t1")
                .entry(json!({"connector_guid": "G2", "hostname": "H2", "network_addresses": null})),
        ));

        assert_eq!(agg.host_count(), 0);
        assert_eq!(agg.entries_seen(), 2);
        assert_eq!(agg.entries_skipped(), 2);
    }

    #[test]
    fn test_empty_address_list_still_registers_guid() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(InventoryPageBuilder::new().computer("G1", "H1", "t1", &[])));

        let host = agg.host("H1").unwrap();
        assert!(host.macs.is_empty());
        assert_eq!(host.guid_last_seen["G1"], "t1");
    }

    #[test]
    fn test_repeated_mac_grows_list_but_not_guid_set() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(InventoryPageBuilder::new().computer("G1", "H1", "t1", &["AA", "AA"])));

        let host = agg.host("H1").unwrap();
        assert_eq!(host.macs, vec!["AA", "AA"]);
        assert_eq!(host.mac_to_guids["AA"].len(), 1);
    }

    #[test]
    fn test_last_seen_is_last_write_not_max() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(InventoryPageBuilder::new().computer("G1", "H1", "2024-06-01", &["AA"])));
        agg.ingest(&page(InventoryPageBuilder::new().computer("G1", "H1", "2023-01-01", &["AA"])));

        assert_eq!(agg.host("H1").unwrap().guid_last_seen["G1"], "2023-01-01");
    }

    #[test]
    fn test_interfaces_without_mac_contribute_nothing() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(InventoryPageBuilder::new().entry(json!({
            "connector_guid": "G1",
            "hostname": "H1",
            "last_seen": "t1",
            "network_addresses": [{"ip": "10.0.0.5"}, {"mac": "AA", "ipv6": "fe80::1"}]
        }))));

        assert_eq!(agg.host("H1").unwrap().macs, vec!["AA"]);
    }

    #[test]
    fn test_live_timestamps_pass_through_unchanged() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(
            InventoryPageBuilder::new()
                .computer_seen_now("G1", "H1", &["AA"])
                .computer_seen_now("G2", "H1", &["AA"]),
        ));

        let host = agg.host("H1").unwrap();
        let stamp = &host.guid_last_seen["G1"];
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2024-01-01T00:00:00Z".len());

        let findings = agg.findings();
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.last_seen == host.guid_last_seen[&f.guid]));
    }

    #[test]
    fn test_every_guid_in_mac_map_has_last_seen() {
        let mut agg = InventoryAggregator::new();
        agg.ingest(&page(
            InventoryPageBuilder::new()
                .computer("G1", "H1", "t1", &["AA", "BB"])
                .computer("G2", "H1", "t2", &["BB"])
                .computer("G3", "H2", "t3", &["CC"]),
        ));

        for record in agg.hosts().values() {
            for guids in record.mac_to_guids.values() {
                for guid in guids {
                    assert!(record.guid_last_seen.contains_key(guid));
                }
            }
        }
    }

    #[test]
    fn test_page_order_does_not_change_aggregate() {
        let a = InventoryPageBuilder::new()
            .computer("G1", "H1", "t1", &["AA"])
            .computer("G3", "H2", "t3", &["CC"]);
        let b = InventoryPageBuilder::new()
            .computer("G2", "H1", "t2", &["AA", "BB"])
            .computer_without_addresses("G4", "H3", "t4");

        let mut forward = InventoryAggregator::new();
        forward.ingest(&page(a.clone()));
        forward.ingest(&page(b.clone()));

        let mut backward = InventoryAggregator::new();
        backward.ingest(&page(b));
        backward.ingest(&page(a));

        let normalize = |agg: InventoryAggregator| {
            let mut hosts = agg.into_hosts();
            for record in hosts.values_mut() {
                record.macs.sort();
            }
            hosts
        };
        assert_eq!(forward.findings(), backward.findings());
        assert_eq!(normalize(forward), normalize(backward));
    }
}
