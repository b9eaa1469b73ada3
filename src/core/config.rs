//! Gate configuration
//!
//! `GateConfig` holds one resolved invocation: which report, which metric,
//! what threshold, and how to present the result.

use crate::core::error::{GateError, Result};
use crate::core::models::Metric;
use crate::core::parser::CounterScope;
use crate::core::presenter::Theme;
use std::path::PathBuf;

/// Output format for gate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable report and banner
    #[default]
    Text,
    /// One JSON document on stdout
    Json,
}

/// Settings for a single gate run
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Path to the JaCoCo XML report
    pub report_path: PathBuf,
    /// Required coverage ratio in [0, 1]
    pub threshold: f64,
    /// Metric compared against the threshold
    pub metric: Metric,
    /// Print the full coverage report even when the gate passes
    pub verbose: bool,
    /// Which counters are summed
    pub scope: CounterScope,
    pub format: OutputFormat,
    pub theme: Theme,
}

impl GateConfig {
    /// Create a config with default metric (line) and presentation.
    pub fn new(report_path: impl Into<PathBuf>, threshold: f64) -> Self {
        Self {
            report_path: report_path.into(),
            threshold,
            metric: Metric::default(),
            verbose: false,
            scope: CounterScope::default(),
            format: OutputFormat::default(),
            theme: Theme::default(),
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_scope(mut self, scope: CounterScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Check that the threshold is a finite ratio in [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(GateError::usage(format!(
                "Threshold must be between 0.0 and 1.0, got: {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Parse a threshold literal such as `0.80`.
///
/// Range checking is left to `GateConfig::validate` so that a missing report
/// is reported first.
pub fn parse_threshold(raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        GateError::usage(format!(
            "Threshold must be a decimal number (e.g. 0.80), got: {}",
            raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::new("target/site/jacoco/jacoco.xml", 0.8);
        assert_eq!(config.metric, Metric::Line);
        assert!(!config.verbose);
        assert_eq!(config.scope, CounterScope::All);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.theme, Theme::Full);
    }

    #[test]
    fn test_builder_chain() {
        let config = GateConfig::new("jacoco.xml", 0.5)
            .with_metric(Metric::Branch)
            .with_verbose(true)
            .with_scope(CounterScope::Report)
            .with_format(OutputFormat::Json)
            .with_theme(Theme::Plain);
        assert_eq!(config.metric, Metric::Branch);
        assert!(config.verbose);
        assert_eq!(config.scope, CounterScope::Report);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.theme, Theme::Plain);
    }

    #[test]
    fn test_validate_bounds_inclusive() {
        assert!(GateConfig::new("r.xml", 0.0).validate().is_ok());
        assert!(GateConfig::new("r.xml", 1.0).validate().is_ok());
        assert!(GateConfig::new("r.xml", 0.75).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = GateConfig::new("r.xml", 1.5).validate().unwrap_err();
        assert!(matches!(err, GateError::Usage { .. }));
        assert!(err.to_string().contains("1.5"));
        assert!(GateConfig::new("r.xml", -0.1).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(GateConfig::new("r.xml", f64::NAN).validate().is_err());
        assert!(GateConfig::new("r.xml", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.80").unwrap(), 0.8);
        assert_eq!(parse_threshold(" 1 ").unwrap(), 1.0);
        assert_eq!(parse_threshold("1.5").unwrap(), 1.5);
        assert!(matches!(parse_threshold("eighty"), Err(GateError::Usage { .. })));
    }
}
