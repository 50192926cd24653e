use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs::{read_to_string, try_exists};
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub sweeps: SweepSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the result directories
    pub results_root: PathBuf,
    /// Regex a result directory name must match to be discovered
    pub dir_pattern: String,
    pub summary_file: String,
    pub python: String,
    pub plot_script: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_root: PathBuf::from("."),
            dir_pattern: "^fio_results_".to_owned(),
            summary_file: "summary.csv".to_owned(),
            python: "python3".to_owned(),
            plot_script: PathBuf::from("plots/sweep.py"),
        }
    }
}

/// Filename conventions of the sweep runner, and the charts derived from them.
///
/// Each pattern must contain one capture group holding the swept value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub block_size_pattern: String,
    pub queue_depth_pattern: String,
    pub block_size_chart: String,
    pub queue_depth_chart: String,
    pub latency_chart: String,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            block_size_pattern: r"bs_(\d+k)".to_owned(),
            queue_depth_pattern: r"qd(\d+)".to_owned(),
            block_size_chart: "blocksize_throughput.png".to_owned(),
            queue_depth_chart: "qd_sweep.png".to_owned(),
            latency_chart: "throughput_vs_latency.png".to_owned(),
        }
    }
}

impl Config {
    /// Loads the yaml config at `path`, falling back to defaults when the file does not exist
    pub async fn load(path: &Path) -> Result<Self> {
        if !try_exists(path)
            .await
            .context(format!("Check config {}", path.display()))?
        {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = read_to_string(path)
            .await
            .context(format!("Read config {}", path.display()))?;
        Self::from_yaml(&content).context(format!("Parse config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(content)?)
    }
}
