//! coverage_gate - JaCoCo coverage quality gate
//!
//! This library reads a JaCoCo XML report, sums its counters per kind
//! (instruction, line, branch) and checks one metric against a threshold.
//! It is consumed by the `coverage-gate` CLI binary.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/coverage_gate.rs**: Thin wrapper that parses arguments and sets the
//!   exit code
//!
//! # Example
//!
//! ```no_run
//! use coverage_gate::{GateConfig, GateEngine, Metric};
//!
//! let config = GateConfig::new("target/site/jacoco/jacoco.xml", 0.80)
//!     .with_metric(Metric::Branch);
//! let outcome = GateEngine::new().run(&config)?;
//! println!("passed: {}", outcome.passed());
//! # Ok::<(), coverage_gate::GateError>(())
//! ```

pub mod core;

pub use crate::core::{
    aggregate, decide, evaluate, format_thousands, parse_report_bytes, parse_report_str,
    parse_threshold, AggregateResult, CounterKind, CounterRecord, CounterScope, CoverageSnapshot,
    EmojiFormatter, FsReportSource, GateConfig, GateDecision, GateEngine, GateError, GateOutcome,
    GatePresenter, KindTotals, Metric, OutputFormat, ReportSource, Result, ResultExt, Theme,
};

/// Library version, taken from Cargo metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
