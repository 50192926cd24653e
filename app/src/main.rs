use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::config::Config;
use eyre::Result;
use fio_sweep::chart::{ChartRenderer, PythonRenderer};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod summarize;

const MODULES: &[&str] = &["fio", "fio_sweep", "common"];

#[derive(Parser)]
#[command(name = "fio-summary", version, about = "Summarize fio sweep results")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Yaml config, defaults are used when missing
    #[arg(short, long, default_value = "summary.yaml")]
    config: PathBuf,
    #[arg(long, default_value_t = false)]
    no_progress: bool,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered result directories
    Ls {
        /// Directory holding the result directories
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
    /// Summarize the latest result directory
    Summarize {
        /// Directory holding the result directories
        #[arg(short, long)]
        root: Option<PathBuf>,
        /// Summarize this result directory instead of the latest one
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Do not generate charts
        #[arg(long, default_value_t = false)]
        skip_plot: bool,
    },
    /// Print the metrics extracted from a single result document
    Extract {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter = EnvFilter::new(format!("fio_summary={log_level}"));

    if !args.log.is_empty() {
        for log in &args.log {
            env_filter = env_filter.add_directive(log.parse()?);
        }
    }

    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(layer().with_ansi(false).with_writer(non_blocking))
        .init();

    let mut config = Config::load(&args.config).await?;
    match args.command {
        Commands::Ls { root } => {
            if let Some(root) = root {
                config.settings.results_root = root;
            }
            for dir in summarize::result_dirs(&config.settings).await? {
                println!("{}", dir.display());
            }
        }
        Commands::Summarize {
            root,
            dir,
            skip_plot,
        } => {
            if let Some(root) = root {
                config.settings.results_root = root;
            }
            let renderer =
                PythonRenderer::new(&config.settings.python, &config.settings.plot_script);
            let renderer: Option<&dyn ChartRenderer> =
                if skip_plot { None } else { Some(&renderer) };
            match summarize::run(&config, dir, renderer, !args.no_progress).await {
                Ok(outcome) => info!(
                    "Summarized {} rows of {} into {} with {} charts",
                    outcome.table.rows().len(),
                    outcome.dir.display(),
                    outcome.summary.display(),
                    outcome.charts.len()
                ),
                Err(err) => {
                    error!("{err:#?}");
                    return Err(err);
                }
            }
        }
        Commands::Extract { file } => match fio::loader::load_document(&file).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("{} has no jobs", file.display()),
        },
    };

    Ok(())
}
