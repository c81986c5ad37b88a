//! JSON outputs of a scan
//!
//! - `duplicate_hosts.json`: hostname -> { guid: last_seen }
//! - `parsed_computers.json`: the full aggregate, MAC->GUID sets as arrays
//!
//! Both files are staged as `<name>.tmp` first and only renamed into place
//! once every staged write succeeded.

use crate::error::{Result, ScanError};
use crate::models::{DuplicateReport, HostsMap};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

pub const DUPLICATE_HOSTS_FILE: &str = "duplicate_hosts.json";
pub const PARSED_COMPUTERS_FILE: &str = "parsed_computers.json";

const STAGING_SUFFIX: &str = ".tmp";

struct StagedFile {
    staged: PathBuf,
    target: PathBuf,
}

/// Write the duplicate report, plus the parsed aggregate when given.
///
/// Returns the final paths in write order.
pub async fn write_outputs(
    dir: &Path,
    report: &DuplicateReport,
    parsed: Option<&HostsMap>,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| ScanError::io(e, dir))?;

    let mut staged = Vec::with_capacity(2);
    let result = stage_all(dir, report, parsed, &mut staged).await;
    if let Err(e) = result {
        discard(&staged).await;
        return Err(e);
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, file) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(&file.staged, &file.target).await {
            discard(&staged[i..]).await;
            return Err(ScanError::io(e, &file.target));
        }
        info!("Wrote {}", file.target.display());
        written.push(file.target.clone());
    }
    Ok(written)
}

async fn stage_all(
    dir: &Path,
    report: &DuplicateReport,
    parsed: Option<&HostsMap>,
    staged: &mut Vec<StagedFile>,
) -> Result<()> {
    staged.push(stage_json(dir, DUPLICATE_HOSTS_FILE, report).await?);
    if let Some(hosts) = parsed {
        staged.push(stage_json(dir, PARSED_COMPUTERS_FILE, hosts).await?);
    }
    Ok(())
}

async fn stage_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<StagedFile> {
    let target = dir.join(file_name);
    let staged = dir.join(format!("{file_name}{STAGING_SUFFIX}"));

    let content = serde_json::to_string(value).map_err(|e| ScanError::io(e.into(), &target))?;
    fs::write(&staged, content)
        .await
        .map_err(|e| ScanError::io(e, &staged))?;

    debug!("Staged {}", staged.display());
    Ok(StagedFile { staged, target })
}

async fn discard(files: &[StagedFile]) {
    for file in files {
        if let Err(e) = fs::remove_file(&file.staged).await {
            warn!("Could not remove {}: {}", file.staged.display(), e);
        }
    }
}

#[cfg(test)]
pub async fn read_duplicate_report(path: &Path) -> Result<DuplicateReport> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScanError::io(e, path))?;
    serde_json::from_str(&content).map_err(|e| ScanError::io(e.into(), path))
}
