//! Core data models for coverage_gate
//!
//! Counter records as read from a report, their per-kind aggregate, and the
//! gate verdict derived from it.

use serde::Serialize;

/// Coverage counter kinds tracked by the gate.
///
/// Reports may carry other kinds (METHOD, CLASS, COMPLEXITY); those are
/// skipped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CounterKind {
    Instruction,
    Line,
    Branch,
}

impl CounterKind {
    /// All tracked kinds, in report order.
    pub const ALL: [CounterKind; 3] =
        [CounterKind::Instruction, CounterKind::Line, CounterKind::Branch];

    /// Parse a report `type` attribute. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INSTRUCTION" => Some(Self::Instruction),
            "LINE" => Some(Self::Line),
            "BRANCH" => Some(Self::Branch),
            _ => None,
        }
    }

    /// Name as it appears in the report.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instruction => "INSTRUCTION",
            Self::Line => "LINE",
            Self::Branch => "BRANCH",
        }
    }

    /// Plural label used in the coverage report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Instruction => "Instructions",
            Self::Line => "Lines",
            Self::Branch => "Branches",
        }
    }
}

/// One `<counter>` element read from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRecord {
    pub kind: CounterKind,
    pub covered: u64,
    pub missed: u64,
}

impl CounterRecord {
    pub fn new(kind: CounterKind, covered: u64, missed: u64) -> Self {
        Self { kind, covered, missed }
    }

    pub fn total(&self) -> u64 {
        self.covered.saturating_add(self.missed)
    }
}

/// Covered/missed totals for one counter kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub covered: u64,
    pub missed: u64,
}

impl KindTotals {
    pub fn new(covered: u64, missed: u64) -> Self {
        Self { covered, missed }
    }

    /// covered + missed
    pub fn total(&self) -> u64 {
        self.covered.saturating_add(self.missed)
    }

    /// Coverage ratio in [0, 1]; exactly 0.0 when there is nothing to cover.
    pub fn ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.covered as f64 / total as f64,
        }
    }

    /// Coverage as a percentage in [0, 100].
    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    pub(crate) fn add(&mut self, covered: u64, missed: u64) {
        self.covered = self.covered.saturating_add(covered);
        self.missed = self.missed.saturating_add(missed);
    }
}

/// Per-kind totals for a whole report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateResult {
    pub instruction: KindTotals,
    pub line: KindTotals,
    pub branch: KindTotals,
}

impl AggregateResult {
    /// Totals for a given kind.
    pub fn totals(&self, kind: CounterKind) -> &KindTotals {
        match kind {
            CounterKind::Instruction => &self.instruction,
            CounterKind::Line => &self.line,
            CounterKind::Branch => &self.branch,
        }
    }

    pub(crate) fn totals_mut(&mut self, kind: CounterKind) -> &mut KindTotals {
        match kind {
            CounterKind::Instruction => &mut self.instruction,
            CounterKind::Line => &mut self.line,
            CounterKind::Branch => &mut self.branch,
        }
    }

    /// Coverage ratio for a given kind.
    pub fn ratio(&self, kind: CounterKind) -> f64 {
        self.totals(kind).ratio()
    }

    /// True when the report contains any line counters.
    pub fn has_line_data(&self) -> bool {
        self.line.total() > 0
    }
}

/// Metric selected for the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Line,
    Instruction,
    Branch,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Instruction => "instruction",
            Self::Branch => "branch",
        }
    }

    /// Title-cased name ("Line", "Instruction", "Branch").
    pub fn title(&self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Instruction => "Instruction",
            Self::Branch => "Branch",
        }
    }

    /// Counter kind backing this metric.
    pub fn kind(&self) -> CounterKind {
        match self {
            Self::Line => CounterKind::Line,
            Self::Instruction => CounterKind::Instruction,
            Self::Branch => CounterKind::Branch,
        }
    }
}

/// Final verdict of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateDecision {
    pub metric: Metric,
    /// Required ratio in [0, 1]
    pub threshold: f64,
    /// Measured ratio in [0, 1]
    pub actual: f64,
    pub passed: bool,
}

impl GateDecision {
    /// Ratio still missing to reach the threshold (0 when passed).
    pub fn gap(&self) -> f64 {
        (self.threshold - self.actual).max(0.0)
    }

    pub fn gap_percent(&self) -> f64 {
        self.gap() * 100.0
    }

    pub fn actual_percent(&self) -> f64 {
        self.actual * 100.0
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold * 100.0
    }
}
