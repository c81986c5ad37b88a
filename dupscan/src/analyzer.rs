//! Duplicate detection over the aggregated hosts
//!
//! A MAC "collides" on a host when it was observed more than once in that
//! host's `macs` list. This includes one connector reporting the same MAC on
//! two interfaces: every GUID recorded against a colliding MAC is flagged.

use crate::models::{DuplicateFinding, HostRecord, HostsMap};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Add one finding per (hostname, guid) implicated in a collision to `out`.
pub fn analyze(hosts: &HostsMap, out: &mut BTreeSet<DuplicateFinding>) {
    for (hostname, record) in hosts {
        let before = out.len();
        for mac in colliding_macs(record) {
            let Some(guids) = record.mac_to_guids.get(mac) else {
                continue;
            };
            for guid in guids {
                let last_seen = record.guid_last_seen.get(guid).cloned().unwrap_or_default();
                out.insert(DuplicateFinding::new(hostname.as_str(), guid.as_str(), last_seen));
            }
        }
        if out.len() > before {
            debug!("{}: {} new duplicate findings", hostname, out.len() - before);
        }
    }
}

pub fn find_duplicates(hosts: &HostsMap) -> BTreeSet<DuplicateFinding> {
    let mut findings = BTreeSet::new();
    analyze(hosts, &mut findings);
    findings
}

/// MACs seen more than once on this host
fn colliding_macs(record: &HostRecord) -> impl Iterator<Item = &str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for mac in &record.macs {
        *counts.entry(mac.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(mac, _)| mac)
}
