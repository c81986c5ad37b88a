//! Grouping findings into the per-host report and printing it

use crate::models::{DuplicateFinding, DuplicateReport};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Group sorted findings by hostname: hostname -> (guid -> last_seen)
pub fn format_findings(findings: &BTreeSet<DuplicateFinding>) -> DuplicateReport {
    let mut report = DuplicateReport::new();
    for finding in findings {
        report
            .entry(finding.hostname.clone())
            .or_default()
            .insert(finding.guid.clone(), finding.last_seen.clone());
    }
    report
}

/// Inventory size as announced by the first page
pub fn write_total<W: Write>(total: u64, mut out: W) -> io::Result<()> {
    writeln!(out, "GUIDs found in environment: {}", total)
}

pub fn print_total(total: u64) -> io::Result<()> {
    let stdout = io::stdout();
    write_total(total, stdout.lock())
}

pub fn write_console<W: Write>(report: &DuplicateReport, mut out: W) -> io::Result<()> {
    writeln!(out, "Hosts with duplicate GUIDs found: {}", report.len())?;
    for (host, dupes) in report {
        writeln!(out)?;
        writeln!(out, "{} has {} duplicates", host, dupes.len())?;
        writeln!(out, "{:>20}{:>36}", "GUID", "LAST SEEN")?;
        for (guid, last_seen) in dupes {
            writeln!(out, "  {} - {}", guid, last_seen)?;
        }
    }
    Ok(())
}

pub fn print_report(report: &DuplicateReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_console(report, stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_sorts_guids_within_host() {
        let findings = BTreeSet::from([
            DuplicateFinding::new("h1", "g2", "t1"),
            DuplicateFinding::new("h1", "g1", "t2"),
            DuplicateFinding::new("h2", "g1", "t3"),
        ]);
        let report = format_findings(&findings);

        let h1: Vec<&str> = report["h1"].keys().map(String::as_str).collect();
        assert_eq!(h1, vec!["g1", "g2"]);
        assert_eq!(report["h1"]["g1"], "t2");
        assert_eq!(report["h2"]["g1"], "t3");
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_empty_findings_give_empty_report() {
        assert!(format_findings(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_console_layout() {
        let findings = BTreeSet::from([
            DuplicateFinding::new("H1", "G1", "2023-01-01"),
            DuplicateFinding::new("H1", "G2", "2023-01-02"),
        ]);
        let mut buf = Vec::new();
        write_console(&format_findings(&findings), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let expected = format!(
            "Hosts with duplicate GUIDs found: 1\n\nH1 has 2 duplicates\n{:>20}{:>36}\n  G1 - 2023-01-01\n  G2 - 2023-01-02\n",
            "GUID", "LAST SEEN"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_total_line() {
        let mut buf = Vec::new();
        write_total(1234, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "GUIDs found in environment: 1234\n");
    }

    #[test]
    fn test_console_with_no_duplicates() {
        let mut buf = Vec::new();
        write_console(&DuplicateReport::new(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Hosts with duplicate GUIDs found: 0\n");
    }
}
