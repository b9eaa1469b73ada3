//! coverage-gate CLI - JaCoCo coverage quality gate
//!
//! Exit status is 0 when the gate passes and 1 on any failure: missing
//! report, bad threshold, unparsable XML, empty coverage or a missed gate.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use coverage_gate::{
    decide, parse_threshold, CounterScope, GateConfig, GateEngine, GateError, GatePresenter, Metric,
    OutputFormat, Theme,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// 🎯 Coverage Gate: check JaCoCo code coverage against a quality gate threshold.
#[derive(Parser, Debug)]
#[command(name = "coverage-gate")]
#[command(version = coverage_gate::VERSION)]
#[command(about = "Check JaCoCo code coverage against quality gate threshold")]
#[command(after_help = "EXAMPLES:
  # Require 80% line coverage
  coverage-gate target/site/jacoco/jacoco.xml 0.80

  # Gate on branch coverage and always print the full report
  coverage-gate jacoco.xml 0.65 --metric branch --verbose

  # Machine-readable output, report-level totals only
  coverage-gate jacoco.xml 0.80 --format json --scope report
")]
struct Cli {
    /// Path to JaCoCo XML report file (jacoco.xml)
    #[arg(value_name = "XML_FILE")]
    xml_file: PathBuf,

    /// Coverage threshold as decimal (e.g., 0.80 for 80%)
    #[arg(value_name = "THRESHOLD", allow_negative_numbers = true)]
    threshold: String,

    /// Coverage metric to check
    #[arg(long = "metric", value_enum, default_value = "line")]
    metric: MetricArg,

    /// Show detailed coverage information
    #[arg(long = "verbose")]
    verbose: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: FormatArg,

    /// Which counters to sum [all: every level, report: report-level totals only]
    #[arg(long = "scope", value_enum, default_value = "all")]
    scope: ScopeArg,

    /// Replace emojis with plain text tags
    #[arg(long = "plain")]
    plain: bool,

    /// Diagnostic log level (written to stderr)
    #[arg(long = "log-level", value_enum, default_value = "warn")]
    log_level: LogLevelArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Line,
    Instruction,
    Branch,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Line => Metric::Line,
            MetricArg::Instruction => Metric::Instruction,
            MetricArg::Branch => Metric::Branch,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScopeArg {
    All,
    Report,
}

impl From<ScopeArg> for CounterScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => CounterScope::All,
            ScopeArg::Report => CounterScope::Report,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for tracing::Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => tracing::Level::ERROR,
            LogLevelArg::Warn => tracing::Level::WARN,
            LogLevelArg::Info => tracing::Level::INFO,
            LogLevelArg::Debug => tracing::Level::DEBUG,
            LogLevelArg::Trace => tracing::Level::TRACE,
        }
    }
}

fn init_logging(level: LogLevelArg) {
    // stdout is reserved for report output
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    // Fix broken pipe panic when piping to head/tail/etc.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures; everything else exits 1
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    init_logging(cli.log_level);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the gate and print its output. Returns whether the gate passed.
///
/// Gate errors are rendered and turned into `Ok(false)`; only failures to
/// write output surface as `Err`.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let theme = if cli.plain { Theme::Plain } else { Theme::Full };
    let presenter = GatePresenter::new().with_theme(theme);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let threshold = match parse_threshold(&cli.threshold) {
        Ok(t) => t,
        Err(e) => return report_error(&presenter, &e),
    };

    let config = GateConfig::new(&cli.xml_file, threshold)
        .with_metric(cli.metric.into())
        .with_verbose(cli.verbose)
        .with_scope(cli.scope.into())
        .with_format(cli.format.into())
        .with_theme(theme);

    tracing::debug!(?config, "gate configuration");

    let engine = GateEngine::new();
    if let Err(e) = engine.check(&config) {
        return report_error(&presenter, &e);
    }
    if config.format == OutputFormat::Text {
        write!(out, "{}", presenter.format_analyzing(&config.report_path))
            .context("writing output")?;
    }

    let snapshot = match engine.read(&config) {
        Ok(snapshot) => snapshot,
        Err(e) => return report_error(&presenter, &e),
    };

    let decision = decide(&snapshot, &config);

    match config.format {
        OutputFormat::Json => {
            let value = presenter.format_json(
                &config.report_path,
                config.scope,
                &snapshot,
                decision.as_ref().ok(),
            );
            let rendered =
                serde_json::to_string_pretty(&value).context("serializing JSON output")?;
            writeln!(out, "{}", rendered).context("writing output")?;
        }
        OutputFormat::Text => {
            if config.verbose || !snapshot.aggregate.has_line_data() {
                write!(out, "{}", presenter.format_coverage_report(&snapshot.aggregate))
                    .context("writing output")?;
            }
            if let Ok(decision) = &decision {
                write!(out, "{}", presenter.format_gate(decision)).context("writing output")?;
            }
        }
    }
    out.flush().context("flushing output")?;

    match decision {
        Ok(decision) => {
            tracing::info!(
                passed = decision.passed,
                actual = decision.actual,
                "gate finished"
            );
            Ok(decision.passed)
        }
        Err(e) => report_error(&presenter, &e),
    }
}

fn report_error(presenter: &GatePresenter, err: &GateError) -> anyhow::Result<bool> {
    tracing::debug!(error = ?err, "gate aborted");
    eprint!("{}", presenter.format_error(err));
    Ok(false)
}
