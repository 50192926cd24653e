use std::path::{Path, PathBuf};

use common::{plot::write_plot_data, util::plot_python};
use eyre::{ContextCompat, Result};
use serde::Serialize;
use tokio::task::spawn_blocking;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: Option<String>,
    pub marker: &'static str,
    pub x: Vec<f64>,
    /// `None` leaves a gap in the line
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    #[serde(skip)]
    pub filepath: PathBuf,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_log: bool,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn legend(&self) -> bool {
        self.series.iter().any(|x| x.label.is_some())
    }
}

#[async_trait::async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Renders `chart` to `chart.filepath`
    async fn render(&self, chart: &LineChart) -> Result<()>;
}

/// Renders charts with matplotlib through `plots/sweep.py`
#[derive(Debug, Clone)]
pub struct PythonRenderer {
    pub python: String,
    pub script: PathBuf,
}

impl PythonRenderer {
    pub fn new(python: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }
}

#[async_trait::async_trait]
impl ChartRenderer for PythonRenderer {
    async fn render(&self, chart: &LineChart) -> Result<()> {
        let plot_dir = chart
            .filepath
            .parent()
            .context(format!("Chart path without parent: {:?}", chart.filepath))?;
        let data_path = write_plot_data(plot_dir, &chart.filepath, chart).await?;

        let args = vec![
            ("--data".to_owned(), path_arg(&data_path)?),
            ("--filepath".to_owned(), path_arg(&chart.filepath)?),
            ("--legend".to_owned(), if chart.legend() { "1" } else { "0" }.to_owned()),
        ];
        debug!("Plotting {}", chart.filepath.display());

        let python = self.python.clone();
        let script = self.script.clone();
        spawn_blocking(move || plot_python(&python, &script, &args)).await??;
        Ok(())
    }
}

fn path_arg(path: &Path) -> Result<String> {
    Ok(path
        .to_str()
        .context(format!("Invalid path {path:?}"))?
        .to_owned())
}
