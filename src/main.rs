//! CLI entry point for the holiday travel dashboard.
//!
//! Provides subcommands for running the whole pipeline, writing only the
//! combined snapshot, and re-rendering the dashboard from a snapshot.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use holiday_travel::{
    build_state_table,
    combine::CombinedStateRow,
    config::{CURRENT_YEAR_ENV, DataPaths, PipelineConfig, SNAPSHOT_FILE},
    output::{print_json, print_pretty, print_summary, read_snapshot, write_snapshot},
    report::{ReportMeta, render_dashboard, write_dashboard},
    stats::SummaryStats,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "holiday_travel")]
#[command(about = "Builds a US holiday travel dashboard from climate, passenger and delay data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding the three source files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Climate-division temperature file (default: <DATA_DIR>/climdiv-tmpcst.txt)
    #[arg(long)]
    temperature: Option<PathBuf>,

    /// Airport passenger CSV (default: <DATA_DIR>/airport_passengers.csv)
    #[arg(long)]
    passengers: Option<PathBuf>,

    /// Flight delay CSV (default: <DATA_DIR>/flight_delays.csv)
    #[arg(long)]
    delays: Option<PathBuf>,

    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Last year of the temperature averaging window
    #[arg(long)]
    current_year: Option<i32>,

    /// Combined CSV snapshot (default: <DATA_DIR>/combined_state_data.csv)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

impl SourceArgs {
    fn paths(&self) -> DataPaths {
        let defaults = DataPaths::from_dir(&self.data_dir);
        DataPaths {
            temperature: self.temperature.clone().unwrap_or(defaults.temperature),
            passengers: self.passengers.clone().unwrap_or(defaults.passengers),
            delays: self.delays.clone().unwrap_or(defaults.delays),
        }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.snapshot
            .clone()
            .unwrap_or_else(|| self.data_dir.join(SNAPSHOT_FILE))
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        pipeline_config(self.config.as_deref(), self.current_year)
    }
}

/// Config file, then `HOLIDAY_CURRENT_YEAR`, then `--current-year`.
fn pipeline_config(path: Option<&Path>, current_year: Option<i32>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    config = config.with_year_override(std::env::var(CURRENT_YEAR_ENV).ok().as_deref());
    if let Some(year) = current_year {
        config = config.with_current_year(year);
    }
    Ok(config)
}

#[derive(Subcommand)]
enum Commands {
    /// Load all sources, write the snapshot, and render the dashboard
    Run {
        #[command(flatten)]
        sources: SourceArgs,

        /// HTML file to write the dashboard to
        #[arg(short, long, default_value = "holiday_dashboard.html")]
        output: PathBuf,
    },
    /// Load all sources and write only the combined snapshot
    Snapshot {
        #[command(flatten)]
        sources: SourceArgs,

        /// Also log the combined table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the dashboard from an existing snapshot
    Render {
        /// Snapshot CSV to read
        #[arg(short, long, default_value = "data/combined_state_data.csv")]
        snapshot: PathBuf,

        /// Optional JSON config file (for the year labels)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Last year of the temperature averaging window (for the year labels)
        #[arg(long)]
        current_year: Option<i32>,

        /// HTML file to write the dashboard to
        #[arg(short, long, default_value = "holiday_dashboard.html")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/holiday_travel.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("holiday_travel.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { sources, output } => {
            let config = sources.pipeline_config()?;
            let rows = build_table(&sources, &config)?;

            let snapshot = sources.snapshot_path();
            write_snapshot(&snapshot, &rows)
                .with_context(|| format!("writing snapshot {}", snapshot.display()))?;
            print_summary(&rows);

            render(&rows, &config, &output)?;
            info!("Analysis complete");
        }
        Commands::Snapshot { sources, json } => {
            let config = sources.pipeline_config()?;
            let rows = build_table(&sources, &config)?;

            let snapshot = sources.snapshot_path();
            write_snapshot(&snapshot, &rows)
                .with_context(|| format!("writing snapshot {}", snapshot.display()))?;
            if json {
                print_json(&rows)?;
            } else {
                print_pretty(&rows);
            }
        }
        Commands::Render {
            snapshot,
            config,
            current_year,
            output,
        } => {
            let config = pipeline_config(config.as_deref(), current_year)?;
            let rows = read_snapshot(&snapshot)
                .with_context(|| format!("reading snapshot {}", snapshot.display()))?;
            render(&rows, &config, &output)?;
        }
    }

    Ok(())
}

fn build_table(
    sources: &SourceArgs,
    config: &PipelineConfig,
) -> Result<Vec<CombinedStateRow>> {
    let paths = sources.paths();
    info!(
        temperature = %paths.temperature.display(),
        passengers = %paths.passengers.display(),
        delays = %paths.delays.display(),
        current_year = config.current_year,
        "Loading datasets"
    );
    build_state_table(&paths, config).context("building state table")
}

/// Renders the dashboard and logs the headline statistics.
fn render(
    rows: &[CombinedStateRow],
    config: &PipelineConfig,
    output: &Path,
) -> Result<()> {
    let stats = SummaryStats::from_rows(rows);
    info!(
        total_travelers = stats.total_travelers,
        avg_delay_pct = ?stats.avg_delay_pct,
        warmest = ?stats.warmest.as_ref().map(|s| &s.state_code),
        coldest = ?stats.coldest.as_ref().map(|s| &s.state_code),
        busiest = ?stats.busiest.as_ref().map(|s| &s.state_code),
        "Summary statistics"
    );

    let html = render_dashboard(rows, &ReportMeta::from_config(config))?;
    write_dashboard(output, &html)
        .with_context(|| format!("writing dashboard {}", output.display()))?;
    Ok(())
}
