/*!
Test harness for scanner runs

Owns a temporary output directory and reads back the JSON files a scan
writes there. Logging is initialized once for the whole test binary.
*/

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestHarness {
    output: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        env_logger::builder().is_test(true).try_init().ok();

        Self {
            output: TempDir::new().expect("failed to create temp output dir"),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output.path()
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output.path().join(file_name)
    }

    pub fn has_output(&self, file_name: &str) -> bool {
        self.output_path(file_name).exists()
    }

    /// Parse an output file as JSON
    pub fn read_json(&self, file_name: &str) -> Result<Value> {
        let path = self.output_path(file_name);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        log::info!("📄 Read {}", path.display());
        Ok(value)
    }

    /// Write a config file into the output dir and return its path
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        let path = self.output_path("dupscan.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn assert_no_outputs(&self) -> Result<()> {
        let leftovers: Vec<_> = std::fs::read_dir(self.output_dir())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".json"))
            .collect();

        if !leftovers.is_empty() {
            anyhow::bail!("unexpected output files: {:?}", leftovers);
        }
        Ok(())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
