//! Gate Presenter Module
//!
//! Turns aggregates and gate decisions into the text or JSON the CLI prints.
//! Purely a view: no decision is taken here.

pub mod emoji_formatter;

pub use emoji_formatter::{EmojiFormatter, Theme};

use crate::core::engine::CoverageSnapshot;
use crate::core::error::GateError;
use crate::core::models::{AggregateResult, CounterKind, GateDecision, KindTotals};
use crate::core::parser::CounterScope;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Write;
use std::path::Path;

/// Width of the rule framing the coverage report.
const RULE_WIDTH: usize = 50;

// =============================================================================
// Gate Presenter
// =============================================================================

/// Renders gate results for humans and machines.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatePresenter {
    emoji: EmojiFormatter,
}

impl GatePresenter {
    /// Create a new presenter with the full emoji theme.
    pub fn new() -> Self {
        Self {
            emoji: EmojiFormatter::new(),
        }
    }

    /// Create a presenter with a specific theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.emoji = self.emoji.with_theme(theme);
        self
    }

    /// Line announcing which report is being analyzed.
    pub fn format_analyzing(&self, path: &Path) -> String {
        format!("{} Analyzing coverage report: {}\n", self.emoji.scan(), path.display())
    }

    /// Per-kind totals framed by rules.
    pub fn format_coverage_report(&self, aggregate: &AggregateResult) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{} Coverage Report", self.emoji.report());
        let _ = writeln!(out, "{}", rule);
        for kind in CounterKind::ALL {
            let _ = writeln!(out, "{}", format_totals_row(kind, aggregate.totals(kind)));
        }
        let _ = writeln!(out, "{}", rule);
        out
    }

    /// Quality gate section with the pass/fail banner.
    pub fn format_gate(&self, decision: &GateDecision) -> String {
        let actual = decision.actual_percent();
        let threshold = decision.threshold_percent();

        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{} Coverage Quality Gate", self.emoji.gate());
        let _ = writeln!(out, "Metric: {} Coverage", decision.metric.title());
        let _ = writeln!(out, "Threshold: {:.1}%", threshold);
        let _ = writeln!(out, "Actual: {:.2}%", actual);

        if decision.passed {
            let _ = writeln!(
                out,
                "{} Quality gate PASSED! ({:.2}% >= {:.1}%)",
                self.emoji.success(),
                actual,
                threshold
            );
        } else {
            let _ = writeln!(
                out,
                "{} Quality gate FAILED! ({:.2}% < {:.1}%)",
                self.emoji.error(),
                actual,
                threshold
            );
            let _ = writeln!(out, "   Need {:.2}% more coverage to pass", decision.gap_percent());
        }
        out
    }

    /// Error message plus any hint lines.
    pub fn format_error(&self, err: &GateError) -> String {
        let mut out = String::new();
        match err.root() {
            GateError::EmptyCoverage { .. } => {
                let _ = writeln!(
                    out,
                    "{} No code coverage data found. This might indicate:",
                    self.emoji.warning()
                );
            }
            _ => {
                let _ = writeln!(out, "{} {}", self.emoji.error(), err);
            }
        }
        for hint in err.hints() {
            let _ = writeln!(out, "   - {}", hint);
        }
        out
    }

    /// Machine-readable document. `decision` is `None` when no gate could be
    /// evaluated (report without line data).
    pub fn format_json(
        &self,
        path: &Path,
        scope: CounterScope,
        snapshot: &CoverageSnapshot,
        decision: Option<&GateDecision>,
    ) -> Value {
        let aggregate = &snapshot.aggregate;
        json!({
            "report": path.display().to_string(),
            "sha256": snapshot.digest,
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "scope": scope,
            "metrics": {
                "instruction": totals_json(&aggregate.instruction),
                "line": totals_json(&aggregate.line),
                "branch": totals_json(&aggregate.branch),
            },
            "gate": decision.map(GateJson::from),
        })
    }
}

/// Gate verdict as emitted in JSON: the decision plus its gap.
#[derive(Serialize)]
struct GateJson<'a> {
    #[serde(flatten)]
    decision: &'a GateDecision,
    gap_percent: f64,
}

impl<'a> From<&'a GateDecision> for GateJson<'a> {
    fn from(decision: &'a GateDecision) -> Self {
        Self {
            decision,
            gap_percent: decision.gap_percent(),
        }
    }
}

fn totals_json(totals: &KindTotals) -> Value {
    json!({
        "covered": totals.covered,
        "missed": totals.missed,
        "total": totals.total(),
        "percent": totals.percent(),
    })
}

/// `Lines:        80 / 100 (80.00%)`
fn format_totals_row(kind: CounterKind, totals: &KindTotals) -> String {
    format!(
        "{:<14}{} / {} ({:.2}%)",
        format!("{}:", kind.label()),
        format_thousands(totals.covered),
        format_thousands(totals.total()),
        totals.percent()
    )
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
