//! dupscan - duplicate connector GUID detection
//!
//! Pages through the inventory API's computer listing and reports every
//! connector GUID whose host has a MAC address observed more than once:
//! - Config from `dupscan.toml` (or `$DUPSCAN_CONFIG`) plus env overrides
//! - Console summary on stdout, logs on stderr
//! - `duplicate_hosts.json` and `parsed_computers.json` in the output dir

mod aggregator;
mod analyzer;
mod config;
mod error;
mod fetcher;
mod models;
mod persistence;
mod report;
mod scan;

use config::ScanConfig;
use error::{Result, ScanError};
use fetcher::HttpPageSource;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

async fn run() -> Result<()> {
    let config = ScanConfig::load()?;
    let source = HttpPageSource::new(&config.api)?;

    let outcome = scan::execute(&source, &config).await?;
    info!(
        "Scan complete: {} GUIDs advertised over {} pages, {} findings on {} hosts",
        outcome.total_advertised,
        outcome.pages_fetched,
        outcome.findings.len(),
        outcome.report.len()
    );
    Ok(())
}

/// The single stderr line printed when a run fails
fn failure_line(err: &ScanError) -> String {
    format!("error: {err}")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Ok if .env is absent

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dupscan=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("scan aborted: {:?}", e);
            eprintln!("{}", failure_line(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_line_is_single_prefixed_line() {
        let err = ScanError::Config("cannot read /nonexistent.toml: No such file or directory".into());
        let line = failure_line(&err);

        assert_eq!(
            line,
            "error: configuration error: cannot read /nonexistent.toml: No such file or directory"
        );
        assert_eq!(line.lines().count(), 1);
        assert_eq!(err.exit_code(), 2);
    }
}
