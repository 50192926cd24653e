use std::{path::Path, process::Command};

use eyre::{Context, ContextCompat, Result, bail};
use tracing::debug;

/// Parses a fio style data size such as `4k`, `1m` or `512` into bytes
pub fn parse_data_size(data_size: &str) -> Result<u64> {
    let data_size = data_size.trim().to_lowercase();
    let (digits, multiplier) = match data_size.chars().last() {
        Some('k') => (&data_size[..data_size.len() - 1], 1024),
        Some('m') => (&data_size[..data_size.len() - 1], 1024 * 1024),
        Some('g') => (&data_size[..data_size.len() - 1], 1024 * 1024 * 1024),
        Some(c) if c.is_ascii_digit() => (data_size.as_str(), 1),
        _ => bail!("Unsupported data size {data_size}"),
    };
    Ok(digits
        .parse::<u64>()
        .context(format!("Parse data size: {data_size}"))?
        * multiplier)
}

/// Runs a python plotting script, passing `args` as `--key value` pairs
pub fn plot_python(python: &str, script: &Path, args: &[(String, String)]) -> Result<()> {
    let script_str = script
        .to_str()
        .context(format!("Invalid plot script path {script:?}"))?;
    let mut cmd = Command::new(python);
    cmd.arg(script_str);
    for (key, value) in args {
        cmd.arg(key).arg(value);
    }
    debug!("Running {python} {script_str} with {} args", args.len());

    let status = cmd
        .status()
        .context(format!("Spawn {python} {script_str}"))?;
    if !status.success() {
        bail!("Plot script {script_str} exited with {status}");
    }
    Ok(())
}
