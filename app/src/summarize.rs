use std::path::{Path, PathBuf};

use common::config::{Config, Settings};
use console::style;
use eyre::{Context, Result};
use fio::{
    loader::{latest_result_dir, list_documents, list_result_dirs, load_records},
    summary::SummaryTable,
};
use fio_sweep::{FioSweep, chart::ChartRenderer};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Outcome {
    pub dir: PathBuf,
    pub summary: PathBuf,
    pub table: SummaryTable,
    pub charts: Vec<PathBuf>,
}

pub async fn result_dirs(settings: &Settings) -> Result<Vec<PathBuf>> {
    let pattern = Regex::new(&settings.dir_pattern).context("Parse dir pattern")?;
    Ok(list_result_dirs(&settings.results_root, &pattern).await?)
}

/// Summarizes `dir`, or the latest result directory when `None`.
///
/// Charts are skipped when no renderer is given.
pub async fn run(
    config: &Config,
    dir: Option<PathBuf>,
    renderer: Option<&dyn ChartRenderer>,
    progress: bool,
) -> Result<Outcome> {
    let dir = match dir {
        Some(dir) => dir,
        None => {
            let pattern =
                Regex::new(&config.settings.dir_pattern).context("Parse dir pattern")?;
            latest_result_dir(&config.settings.results_root, &pattern).await?
        }
    };
    println!("Reading results from: {}", style(dir.display()).bold());

    let documents = list_documents(&dir).await?;
    debug!("Found {} documents in {}", documents.len(), dir.display());

    let bar = progress_bar(documents.len() as u64, progress);
    let report = load_records(&documents, |path| {
        bar.set_message(file_name(path));
        bar.inc(1);
    })
    .await;
    bar.finish_and_clear();
    if !report.failed.is_empty() {
        println!(
            "{} {} unreadable result file(s)",
            style("Skipped").yellow(),
            report.failed.len()
        );
    }

    let table = SummaryTable::from_records(report.records);
    let summary = dir.join(&config.settings.summary_file);
    table.persist(&summary)?;
    println!("Summary CSV written to {}", summary.display());
    println!("{}", table.console_projection());

    let charts = match renderer {
        Some(renderer) => {
            FioSweep::new(&config.sweeps)?
                .render(table.rows(), &dir, renderer)
                .await?
        }
        None => {
            info!("Skipping charts");
            Vec::new()
        }
    };
    for chart in &charts {
        println!("Saved: {}", chart.display());
    }

    Ok(Outcome {
        dir,
        summary,
        table,
        charts,
    })
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(bar_style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        bar.set_style(bar_style);
    }
    bar
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_default()
}
