//! Gate engine
//!
//! Runs the pipeline: locate report → validate threshold → read → parse →
//! aggregate → evaluate. Rendering is left to the presenter.

use crate::core::aggregate::aggregate;
use crate::core::config::GateConfig;
use crate::core::error::{GateError, Result};
use crate::core::gate::evaluate;
use crate::core::models::{AggregateResult, GateDecision};
use crate::core::parser::{parse_report_bytes, FsReportSource, ReportSource};
use sha2::{Digest, Sha256};

/// Aggregated counters of one report, before any gate decision.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSnapshot {
    pub aggregate: AggregateResult,
    /// SHA-256 of the report bytes, lowercase hex
    pub digest: String,
}

/// Everything a successful run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub snapshot: CoverageSnapshot,
    pub decision: GateDecision,
}

impl GateOutcome {
    pub fn passed(&self) -> bool {
        self.decision.passed
    }
}

/// Coverage gate pipeline over a report source.
pub struct GateEngine<S: ReportSource = FsReportSource> {
    source: S,
}

impl Default for GateEngine<FsReportSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl GateEngine<FsReportSource> {
    /// Engine reading reports from the filesystem.
    pub fn new() -> Self {
        Self {
            source: FsReportSource,
        }
    }
}

impl<S: ReportSource> GateEngine<S> {
    /// Engine reading reports from a custom source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Checks that need no parsing: report existence, then threshold range.
    pub fn check(&self, config: &GateConfig) -> Result<()> {
        let path = config.report_path.as_path();
        if !self.source.exists(path) {
            return Err(GateError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        config.validate()
    }

    /// Check, read and aggregate the report.
    ///
    /// Nothing is read or parsed when `check` fails.
    pub fn load(&self, config: &GateConfig) -> Result<CoverageSnapshot> {
        self.check(config)?;
        self.read(config)
    }

    /// Read and aggregate the report without running `check` first.
    ///
    /// For callers that already ran `check` and act on its result before
    /// the report is parsed.
    pub fn read(&self, config: &GateConfig) -> Result<CoverageSnapshot> {
        let path = config.report_path.as_path();
        let bytes = self.source.read_report(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "report read");

        let records = parse_report_bytes(path, &bytes, config.scope)?;
        let aggregate = aggregate(&records);
        let digest = format!("{:x}", Sha256::digest(&bytes));

        Ok(CoverageSnapshot { aggregate, digest })
    }

    /// Run the whole pipeline.
    pub fn run(&self, config: &GateConfig) -> Result<GateOutcome> {
        let snapshot = self.load(config)?;
        let decision = decide(&snapshot, config)?;
        Ok(GateOutcome { snapshot, decision })
    }
}

/// Evaluate the configured gate over a loaded snapshot.
///
/// Fails with `EmptyCoverage` when the report has no line counters, whatever
/// metric was selected.
pub fn decide(snapshot: &CoverageSnapshot, config: &GateConfig) -> Result<GateDecision> {
    if !snapshot.aggregate.has_line_data() {
        return Err(GateError::EmptyCoverage {
            aggregate: snapshot.aggregate.clone(),
        });
    }
    Ok(evaluate(&snapshot.aggregate, config.metric, config.threshold))
}
