//! One complete scan: paginate, aggregate, analyze, then report and persist

use crate::aggregator::InventoryAggregator;
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::fetcher::{PageSource, Paginator};
use crate::models::{DuplicateFinding, DuplicateReport, HostsMap};
use crate::persistence;
use crate::report::{self, format_findings};
use std::collections::BTreeSet;
use tracing::info;

/// Result of a complete, successful scan
#[derive(Debug)]
pub struct ScanOutcome {
    pub total_advertised: u64,
    pub pages_fetched: u32,
    pub hosts: HostsMap,
    pub findings: BTreeSet<DuplicateFinding>,
    pub report: DuplicateReport,
}

/// Page through the whole inventory, then analyze.
///
/// Any failure discards everything gathered so far.
pub async fn run_scan<S: PageSource>(source: &S, config: &ScanConfig) -> Result<ScanOutcome> {
    let start_url = config.api.computers_url();
    info!("Querying {}", start_url);

    let mut pager = Paginator::new(source, start_url, config.scan.max_pages);
    let mut aggregator = InventoryAggregator::new();

    while let Some(page) = pager.next_page().await? {
        aggregator.ingest(&page);
    }

    info!(
        "Fetched {} pages: {} entries, {} without network data, {} hostnames",
        pager.pages_fetched(),
        aggregator.entries_seen(),
        aggregator.entries_skipped(),
        aggregator.host_count()
    );

    let findings = aggregator.findings();
    let report = format_findings(&findings);

    Ok(ScanOutcome {
        total_advertised: pager.total_advertised().unwrap_or_default(),
        pages_fetched: pager.pages_fetched(),
        hosts: aggregator.into_hosts(),
        findings,
        report,
    })
}

/// Scan, print the console report, then persist the JSON outputs.
///
/// Nothing is written unless the whole inventory was fetched.
pub async fn execute<S: PageSource>(source: &S, config: &ScanConfig) -> Result<ScanOutcome> {
    let outcome = run_scan(source, config).await?;

    report::print_total(outcome.total_advertised)
        .and_then(|()| report::print_report(&outcome.report))
        .map_err(|e| ScanError::io(e, "<stdout>"))?;

    let parsed = config.scan.write_parsed.then_some(&outcome.hosts);
    persistence::write_outputs(&config.scan.output_dir, &outcome.report, parsed).await?;
    Ok(outcome)
}
