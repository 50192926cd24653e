use std::path::{Path, PathBuf};

use common::config::SweepSettings;
use eyre::{Context, Result};
use fio::MetricRecord;
use regex::Regex;
use tracing::{debug, info};

pub mod chart;
pub mod sweep;

use chart::{ChartRenderer, LineChart, Series};
use sweep::{SweepPoint, block_size_sweep, queue_depth_sweep};

/// Block size and queue depth sweep charts of a result directory
#[derive(Debug, Clone)]
pub struct FioSweep {
    block_size: Regex,
    queue_depth: Regex,
    settings: SweepSettings,
}

impl FioSweep {
    pub fn new(settings: &SweepSettings) -> Result<Self> {
        Ok(Self {
            block_size: Regex::new(&settings.block_size_pattern)
                .context("Parse block size pattern")?,
            queue_depth: Regex::new(&settings.queue_depth_pattern)
                .context("Parse queue depth pattern")?,
            settings: settings.clone(),
        })
    }

    /// The charts that have data, an empty sweep produces no chart
    pub fn charts(&self, records: &[MetricRecord], plot_dir: &Path) -> Vec<LineChart> {
        let mut charts = Vec::new();

        let bs = block_size_sweep(records, &self.block_size);
        if bs.is_empty() {
            debug!("No block size sweep records");
        } else {
            charts.push(LineChart {
                filepath: plot_dir.join(&self.settings.block_size_chart),
                title: "Block-size sweep (throughput)",
                x_label: "Block size (KiB)",
                y_label: "Throughput (MB/s)",
                x_log: true,
                series: vec![series(None, "o", &bs, |x| Some(x.bandwidth_mbs))],
            });
        }

        let qd = queue_depth_sweep(records, &self.queue_depth);
        if qd.is_empty() {
            debug!("No queue depth sweep records");
        } else {
            charts.push(LineChart {
                filepath: plot_dir.join(&self.settings.queue_depth_chart),
                title: "Queue-depth sweep",
                x_label: "Queue depth",
                y_label: "IOPS / MB/s",
                x_log: true,
                series: vec![
                    series(Some("IOPS"), "o", &qd, |x| Some(x.iops)),
                    series(Some("MB/s"), "x", &qd, |x| Some(x.bandwidth_mbs)),
                ],
            });
            // Assumes nanoseconds, even when the mean came from lat_us
            charts.push(LineChart {
                filepath: plot_dir.join(&self.settings.latency_chart),
                title: "Throughput vs latency (QD sweep)",
                x_label: "Throughput (MB/s)",
                y_label: "Avg latency (us)",
                x_log: false,
                series: vec![Series {
                    label: None,
                    marker: "o",
                    x: qd.iter().map(|x| x.record.bandwidth_mbs).collect(),
                    y: qd
                        .iter()
                        .map(|x| x.record.avg_latency_ns.map(|ns| ns / 1000.0))
                        .collect(),
                }],
            });
        }
        charts
    }

    /// Renders every non-empty chart into `plot_dir`, returning the written paths
    pub async fn render(
        &self,
        records: &[MetricRecord],
        plot_dir: &Path,
        renderer: &dyn ChartRenderer,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for chart in self.charts(records, plot_dir) {
            renderer
                .render(&chart)
                .await
                .context(format!("Render {}", chart.filepath.display()))?;
            info!("Saved chart {}", chart.filepath.display());
            written.push(chart.filepath);
        }
        Ok(written)
    }
}

fn series(
    label: Option<&str>,
    marker: &'static str,
    points: &[SweepPoint<'_>],
    value: fn(&MetricRecord) -> Option<f64>,
) -> Series {
    Series {
        label: label.map(str::to_owned),
        marker,
        x: points.iter().map(|x| x.key as f64).collect(),
        y: points.iter().map(|x| value(x.record)).collect(),
    }
}
