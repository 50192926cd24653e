use std::path::{Path, PathBuf};

use eyre::{ContextCompat, Result};
use serde::Serialize;
use tokio::fs::{create_dir_all, write};

pub const PLOT_DATA_DIR: &str = "plot_data";

pub async fn ensure_dirs(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        create_dir_all(dir).await?;
    }
    Ok(())
}

/// Dumps `data` as json next to the plot it feeds, ie. `<plot_dir>/plot_data/<stem>.json`
pub async fn write_plot_data<T: Serialize>(
    plot_dir: &Path,
    filepath: &Path,
    data: &T,
) -> Result<PathBuf> {
    let plot_data_dir = plot_dir.join(PLOT_DATA_DIR);
    ensure_dirs(&[plot_data_dir.clone()]).await?;

    let stem = filepath
        .file_stem()
        .and_then(|s| s.to_str())
        .context(format!("Invalid filepath for plot: {filepath:?}"))?;
    let data_path = plot_data_dir.join(format!("{stem}.json"));
    write(&data_path, serde_json::to_string(data)?).await?;
    Ok(data_path)
}
