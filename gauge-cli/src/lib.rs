#![warn(missing_docs)]
//! Gauge CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Declare a suite with [`bench`] and [`bgroup`], then hand it to [`run`]
//! (or `gauge::run`) from your main function.
//!
//! # Example
//!
//! ```no_run
//! use gauge_cli::{bench, bgroup};
//! use gauge_core::workload::iter;
//!
//! fn main() -> anyhow::Result<()> {
//!     gauge_cli::run(vec![bgroup(
//!         "math",
//!         vec![bench("add", iter(|| std::hint::black_box(2) + 2))],
//!     )])
//! }
//! ```

mod config;
mod executor;
mod planner;
mod tree;

pub use config::*;
pub use executor::{Executor, format_human_output};
pub use planner::{ExecutionPlan, PlannedBenchmark, build_plan, join_path};
pub use tree::{BenchTree, bench, bench_with, bgroup};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use gauge_core::{
    ClockKind, DEFAULT_MIN_TRIALS, DEFAULT_TARGET_PRECISION, OptionSpec, OutputFormat, RunConfig,
    RuntimeStats, TrackingStats, pin_to_cpu,
};
use gauge_report::{BenchmarkStatus, CsvSink, Report};
use regex::Regex;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Gauge CLI arguments
#[derive(Parser, Debug)]
#[command(name = "gauge")]
#[command(author, version, about = "Gauge - adaptive benchmarking for Rust")]
pub struct Cli {
    /// Optional subcommand; defaults to running benchmarks
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run only benchmarks whose dotted path matches this regex
    pub filter: Option<String>,

    /// Target relative standard deviation, in percent; overrides gauge.toml (else 5)
    #[arg(long)]
    pub stdev: Option<f64>,

    /// Time budget per benchmark, e.g. "30", "500ms", "2m"; overrides gauge.toml
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Write results to this CSV file instead of the console
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Requested parallelism; benchmarks only run with 1; overrides gauge.toml (else 1)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Trials required before a timeout may produce an estimate; overrides gauge.toml (else 2)
    #[arg(long)]
    pub min_trials: Option<u32>,

    /// Timing clock: monotonic or cpu; overrides gauge.toml (else monotonic)
    #[arg(long)]
    pub clock: Option<ClockKind>,

    /// Pin the runner thread to this CPU
    #[arg(long)]
    pub pin_cpu: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List benchmarks without running them
    List {
        /// Regex on the dotted path
        filter: Option<String>,
    },
}

fn parse_timeout(s: &str) -> Result<Duration, ConfigError> {
    GaugeConfig::parse_duration(s)
}

/// Effective run settings after layering gauge.toml and CLI flags
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Configuration handed to every leaf
    pub run: RunConfig,
    /// CSV destination, if any
    pub csv: Option<PathBuf>,
    /// CPU to pin the runner thread to
    pub pin_cpu: Option<usize>,
}

/// Layer settings: built-in defaults → gauge.toml → CLI flags.
pub fn resolve_settings(cli: &Cli, config: &GaugeConfig) -> anyhow::Result<Settings> {
    let runner = &config.runner;

    let target_precision = match cli.stdev.or(runner.stdev) {
        Some(percent) if !percent.is_finite() || percent <= 0.0 => {
            bail!("stdev must be a positive percentage, got {percent}")
        }
        Some(percent) => percent / 100.0,
        None => DEFAULT_TARGET_PRECISION,
    };

    let timeout = match (cli.timeout, runner.timeout.as_deref()) {
        (Some(t), _) => Some(t),
        (None, Some(s)) => Some(GaugeConfig::parse_duration(s).context("runner.timeout")?),
        (None, None) => None,
    };

    let clock = match (cli.clock, runner.clock.as_deref()) {
        (Some(c), _) => c,
        (None, Some(s)) => s
            .parse::<ClockKind>()
            .map_err(anyhow::Error::msg)
            .context("runner.clock")?,
        (None, None) => ClockKind::default(),
    };

    let csv = cli.csv.clone().or_else(|| config.output.csv.clone());
    let format = if csv.is_some() {
        OutputFormat::Csv
    } else {
        OutputFormat::Human
    };

    Ok(Settings {
        run: RunConfig {
            target_precision,
            timeout,
            format,
            jobs: cli.jobs.or(runner.jobs).unwrap_or(1),
            min_trials: cli
                .min_trials
                .or(runner.min_trials)
                .unwrap_or(DEFAULT_MIN_TRIALS),
            clock,
        },
        csv,
        pin_cpu: cli.pin_cpu.or(runner.pin_cpu),
    })
}

/// Install the stderr log subscriber. `RUST_LOG` wins when set.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "gauge=debug" } else { "gauge=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed by an embedding program or test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the Gauge CLI on `suite` with the process arguments.
/// This is the main entry point for benchmark binaries.
///
/// Exits the process with status 1 when any benchmark failed or crashed.
pub fn run(suite: Vec<BenchTree>) -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = run_with_cli(cli, suite)?;
    if let Some(report) = report.filter(Report::has_failures) {
        eprintln!(
            "\n{} benchmark(s) failed, {} crashed",
            report.summary.failed, report.summary.crashed
        );
        std::process::exit(1);
    }

    Ok(())
}

/// Run the Gauge CLI with pre-parsed arguments.
///
/// Returns the report of the run, or `None` when nothing was run.
pub fn run_with_cli(cli: Cli, mut suite: Vec<BenchTree>) -> anyhow::Result<Option<Report>> {
    let config = GaugeConfig::discover()?.unwrap_or_default();

    if let Some(Commands::List { filter }) = &cli.command {
        let filter = compile_filter(filter.as_deref().or(cli.filter.as_deref()))?;
        list_benchmarks(&mut suite, filter.as_ref());
        return Ok(None);
    }

    let settings = resolve_settings(&cli, &config)?;
    let filter = compile_filter(cli.filter.as_deref())?;
    run_benchmarks(&mut suite, filter.as_ref(), &settings)
}

fn compile_filter(pattern: Option<&str>) -> anyhow::Result<Option<Regex>> {
    pattern
        .map(|p| Regex::new(p).with_context(|| format!("invalid filter {p:?}")))
        .transpose()
}

fn list_benchmarks(suite: &mut [BenchTree], filter: Option<&Regex>) {
    println!("Gauge Plan:");

    let plan = build_plan(suite, filter);
    let mut options: Vec<&'static OptionSpec> = Vec::new();
    for bench in &plan.benchmarks {
        println!("├── {}", bench.path);
        for spec in bench.runnable.options() {
            if !options.iter().any(|o| o.name == spec.name) {
                options.push(spec);
            }
        }
    }

    println!("{} benchmarks found.", plan.benchmarks.len());

    if !options.is_empty() {
        println!("Options:");
        for spec in options {
            println!("  --{:<12} {}", spec.name, spec.help);
        }
    }
}

/// Executor for a run; a CSV sink replaces all interactive output
fn build_executor(settings: &Settings, sink: Option<CsvSink>) -> Executor {
    let executor = Executor::new(settings.run.clone());
    match sink {
        Some(sink) => executor.with_csv(sink).with_progress(false),
        None => executor,
    }
}

fn run_benchmarks(
    suite: &mut [BenchTree],
    filter: Option<&Regex>,
    settings: &Settings,
) -> anyhow::Result<Option<Report>> {
    let plan = build_plan(suite, filter);
    if plan.is_empty() {
        println!("No benchmarks found.");
        return Ok(None);
    }

    if let Some(cpu) = settings.pin_cpu {
        if let Err(e) = pin_to_cpu(cpu) {
            tracing::warn!(cpu, error = %e, "failed to pin to CPU");
        }
    }

    let accounting = TrackingStats::detect().is_enabled();
    let sink = match &settings.csv {
        Some(path) => Some(
            CsvSink::create(path, accounting)
                .with_context(|| format!("opening CSV output {}", path.display()))?,
        ),
        None => {
            println!("Running {} benchmarks...", plan.benchmarks.len());
            None
        }
    };
    let mut executor = build_executor(settings, sink);

    let start_time = Instant::now();
    let results = executor
        .execute(plan.benchmarks)
        .context("writing CSV output")?;
    // Closes the CSV file
    drop(executor);

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = Report::new(results, accounting, total_duration_ms);

    match settings.run.format {
        OutputFormat::Human => print!("{}", format_human_output(&report)),
        OutputFormat::Csv => {
            for result in &report.results {
                if result.status != BenchmarkStatus::Passed {
                    eprintln!(
                        "{}: {}",
                        result.name,
                        result.failure.as_deref().unwrap_or("failed")
                    );
                }
            }
        }
    }

    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&["gauge"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.filter, None);

        let settings = resolve_settings(&cli, &GaugeConfig::default()).unwrap();
        assert_eq!(settings.run, RunConfig::default());
        assert_eq!(settings.csv, None);
        assert_eq!(settings.pin_cpu, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = parse(&[
            "gauge",
            "^sort\\.",
            "--stdev",
            "1",
            "--timeout",
            "500ms",
            "--csv",
            "out.csv",
            "-j",
            "2",
            "--min-trials",
            "4",
            "--clock",
            "cpu",
            "--pin-cpu",
            "3",
            "--bench",
        ]);
        assert_eq!(cli.filter.as_deref(), Some("^sort\\."));

        let settings = resolve_settings(&cli, &GaugeConfig::default()).unwrap();
        assert_eq!(settings.run.target_precision, 0.01);
        assert_eq!(settings.run.timeout, Some(Duration::from_millis(500)));
        assert_eq!(settings.run.format, OutputFormat::Csv);
        assert_eq!(settings.run.jobs, 2);
        assert_eq!(settings.run.min_trials, 4);
        assert_eq!(settings.run.clock, ClockKind::Cpu);
        assert_eq!(settings.csv, Some(PathBuf::from("out.csv")));
        assert_eq!(settings.pin_cpu, Some(3));
    }

    #[test]
    fn test_list_subcommand() {
        let cli = parse(&["gauge", "list", "small"]);
        assert_eq!(
            cli.command,
            Some(Commands::List {
                filter: Some("small".to_string())
            })
        );
    }

    #[test]
    fn test_bad_timeout_rejected() {
        assert!(Cli::try_parse_from(["gauge", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = GaugeConfig::default();
        config.runner.stdev = Some(2.0);
        config.runner.timeout = Some("10s".to_string());
        config.runner.clock = Some("cpu".to_string());
        config.runner.min_trials = Some(5);
        config.output.csv = Some(PathBuf::from("file.csv"));

        let from_file = resolve_settings(&parse(&["gauge"]), &config).unwrap();
        assert_eq!(from_file.run.target_precision, 0.02);
        assert_eq!(from_file.run.timeout, Some(Duration::from_secs(10)));
        assert_eq!(from_file.run.clock, ClockKind::Cpu);
        assert_eq!(from_file.run.min_trials, 5);
        assert_eq!(from_file.csv, Some(PathBuf::from("file.csv")));

        let cli = parse(&[
            "gauge",
            "--stdev",
            "10",
            "--timeout",
            "1",
            "--clock",
            "monotonic",
            "--csv",
            "cli.csv",
        ]);
        let overridden = resolve_settings(&cli, &config).unwrap();
        assert_eq!(overridden.run.target_precision, 0.1);
        assert_eq!(overridden.run.timeout, Some(Duration::from_secs(1)));
        assert_eq!(overridden.run.clock, ClockKind::Monotonic);
        assert_eq!(overridden.run.min_trials, 5);
        assert_eq!(overridden.csv, Some(PathBuf::from("cli.csv")));
    }

    #[test]
    fn test_invalid_settings() {
        let cli = parse(&["gauge", "--stdev", "0"]);
        assert!(resolve_settings(&cli, &GaugeConfig::default()).is_err());

        let mut config = GaugeConfig::default();
        config.runner.clock = Some("sundial".to_string());
        assert!(resolve_settings(&parse(&["gauge"]), &config).is_err());

        let mut config = GaugeConfig::default();
        config.runner.timeout = Some("later".to_string());
        assert!(resolve_settings(&parse(&["gauge"]), &config).is_err());
    }

    #[test]
    fn test_csv_mode_hides_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let cli = parse(&["gauge", "--csv", path.to_str().unwrap()]);
        let settings = resolve_settings(&cli, &GaugeConfig::default()).unwrap();

        let sink = CsvSink::create(&path, false).unwrap();
        let executor = build_executor(&settings, Some(sink));
        assert!(!executor.shows_progress());

        let human = resolve_settings(&parse(&["gauge"]), &GaugeConfig::default()).unwrap();
        assert!(build_executor(&human, None).shows_progress());
    }

    #[test]
    fn test_invalid_filter() {
        assert!(compile_filter(Some("(")).is_err());
        assert!(compile_filter(None).unwrap().is_none());
    }
}
