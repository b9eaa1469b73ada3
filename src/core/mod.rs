//! Core module for coverage_gate
//!
//! # Architecture
//!
//! - `models`: CounterRecord, AggregateResult, GateDecision
//! - `error`: Error types using thiserror
//! - `parser`: ReportSource trait + JaCoCo XML counter walk
//! - `aggregate`: per-kind summation
//! - `gate`: threshold evaluation
//! - `config`: resolved invocation settings
//! - `engine`: GateEngine pipeline orchestration
//! - `presenter`: text and JSON rendering

pub mod models;
pub mod error;
pub mod parser;
pub mod aggregate;
pub mod gate;
pub mod config;
pub mod engine;
pub mod presenter;

// Re-export commonly used types
pub use models::{AggregateResult, CounterKind, CounterRecord, GateDecision, KindTotals, Metric};
pub use error::{GateError, Result, ResultExt};
pub use parser::{
    parse_report_bytes, parse_report_str, CounterScope, FsReportSource, ReportSource,
};
pub use aggregate::aggregate;
pub use gate::evaluate;
pub use config::{parse_threshold, GateConfig, OutputFormat};
pub use engine::{decide, CoverageSnapshot, GateEngine, GateOutcome};
pub use presenter::{format_thousands, EmojiFormatter, GatePresenter, Theme};
