//! CLI entry point for the support dashboard.
//!
//! Loads the weekly inquiry spreadsheet once, then prints or charts each
//! report requested on the command line.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use support_dashboard::analyzers::Aggregator;
use support_dashboard::config::DashboardConfig;
use support_dashboard::loader::{Loader, LoaderConfig, MalformedCellPolicy};
use support_dashboard::output::{
    Summary, band_counts_line, nps_breakdown_lines, nps_line, print_json, print_pretty,
};
use support_dashboard::render::{ChartData, render};
use support_dashboard::time_of_day::{TimeFormat, TimeOfDay, parse_time_of_day};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "support_dashboard")]
#[command(about = "Support dashboard customer inquiries", long_about = None)]
struct Cli {
    /// Bar plot number of customer inquiries for each day
    #[arg(long)]
    weekday_inquiries_per_day: bool,

    /// Print shortest and longest customer inquiry time
    #[arg(long)]
    shortest_and_longest_inquiry_time: bool,

    /// Print mean customer inquiry time for the week
    #[arg(long)]
    mean_inquiry_time: bool,

    /// Show number of customer inquiries between hours
    #[arg(long)]
    inquiries_between: bool,

    /// Show number of customer inquiries between two times of day
    #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_bound)]
    count_between: Option<Vec<TimeOfDay>>,

    /// Show net promoter score for customer inquiries
    #[arg(long)]
    net_promoter_score: bool,

    /// Also show detractor, passive and promoter shares with the NPS
    #[arg(long)]
    nps_breakdown: bool,

    /// Show pie plot for customer inquiries between hours
    #[arg(short, long)]
    pie_plot: bool,

    /// Print every statistic as JSON
    #[arg(long)]
    json: bool,

    /// Spreadsheet to read (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    #[arg(long, env = "SUPPORT_DASHBOARD_DATA", value_name = "FILE")]
    data: Option<PathBuf>,

    /// Worksheet name, defaults to the first sheet
    #[arg(long)]
    sheet: Option<String>,

    /// Treat the first row as data instead of a header
    #[arg(long)]
    no_header: bool,

    /// What to do with unparseable cells: fail or skip
    #[arg(long, value_name = "POLICY")]
    on_malformed: Option<MalformedCellPolicy>,

    /// Time display format: colon, lettered, or a strftime pattern
    #[arg(long, value_parser = parse_time_format)]
    time_format: Option<TimeFormat>,

    /// Maximum bar length of terminal charts
    #[arg(long)]
    chart_width: Option<usize>,

    /// JSON config file
    #[arg(long, env = "SUPPORT_DASHBOARD_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn any_report(&self) -> bool {
        self.weekday_inquiries_per_day
            || self.shortest_and_longest_inquiry_time
            || self.mean_inquiry_time
            || self.inquiries_between
            || self.count_between.is_some()
            || self.net_promoter_score
            || self.pie_plot
            || self.json
    }

    /// Flags win over the config file.
    fn merge_into(&self, mut config: DashboardConfig) -> DashboardConfig {
        if self.data.is_some() {
            config.data = self.data.clone();
        }
        if self.sheet.is_some() {
            config.sheet = self.sheet.clone();
        }
        if self.no_header {
            config.skip_header = Some(false);
        }
        if self.on_malformed.is_some() {
            config.on_malformed = self.on_malformed;
        }
        if self.time_format.is_some() {
            config.time_format = self.time_format.clone();
        }
        if self.chart_width.is_some() {
            config.chart_width = self.chart_width;
        }
        config
    }
}

fn parse_bound(s: &str) -> std::result::Result<TimeOfDay, String> {
    parse_time_of_day(s).map_err(|e| e.to_string())
}

fn parse_time_format(s: &str) -> std::result::Result<TimeFormat, String> {
    s.parse::<TimeFormat>().map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    run(&cli)
}

/// Colored stderr logging plus a JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/support_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("support_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(file_guard)
}

fn run(cli: &Cli) -> Result<()> {
    let file_config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let config = cli.merge_into(file_config);

    if !cli.any_report() {
        info!("No report requested, pass --help to list them");
        return Ok(());
    }

    let exe = std::env::current_exe().ok();
    let path = config.data_path(exe.as_deref());
    let loader = Loader::new(LoaderConfig {
        path: path.clone(),
        sheet: config.sheet.clone(),
        skip_header: config.skip_header.unwrap_or(true),
        on_malformed: config.on_malformed.unwrap_or_default(),
    });
    let table = loader
        .load()
        .with_context(|| format!("Failed to load inquiries from {}", path.display()))?;

    let agg = Aggregator::new(&table);
    let format = config.time_format.clone().unwrap_or_default();
    let width = config.chart_width();
    let mut out = io::stdout().lock();

    if cli.weekday_inquiries_per_day {
        render(&ChartData::weekday_bar(&agg.weekday_counts()), width, &mut out)?;
    }

    if cli.shortest_and_longest_inquiry_time {
        writeln!(
            out,
            "Shortest inquiry time: {}",
            format.format(agg.min_duration_time()?)
        )?;
        writeln!(
            out,
            "Longest inquiry time: {}",
            format.format(agg.max_duration_time()?)
        )?;
    }

    if cli.mean_inquiry_time {
        writeln!(
            out,
            "Mean inquiry time: {}",
            format.format(agg.mean_duration_time()?)
        )?;
    }

    let bands = agg.time_band_counts();
    if cli.inquiries_between {
        writeln!(out, "{}", band_counts_line(&bands))?;
    }

    if let Some(bounds) = &cli.count_between {
        let (start, end) = (bounds[0], bounds[1]);
        if start > end {
            warn!(%start, %end, "Start is after end, the interval is empty");
        }
        writeln!(
            out,
            "{} -> {}: {}",
            start.format("%H:%M:%S"),
            end.format("%H:%M:%S"),
            agg.count_between(start, end)
        )?;
    }

    if cli.net_promoter_score {
        let nps = agg.net_promoter_score()?;
        writeln!(out, "{}", nps_line(&nps))?;
        if cli.nps_breakdown {
            for line in nps_breakdown_lines(&nps) {
                writeln!(out, "{line}")?;
            }
        }
    }

    if cli.pie_plot {
        render(&ChartData::time_band_pie(&bands), width, &mut out)?;
    }

    if cli.json {
        let summary = Summary::collect(&agg, &format)?;
        print_pretty(&summary);
        print_json(&summary, &mut out)?;
    }

    Ok(())
}
