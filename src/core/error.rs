//! Error types for coverage_gate
//!
//! This module provides structured error handling using thiserror.
//! Every variant is terminal for a single gate invocation.

use crate::core::models::AggregateResult;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors that can occur while checking a coverage report
#[derive(Error, Debug)]
pub enum GateError {
    /// Bad command-line input (threshold out of range, unparsable number)
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// Report path does not exist
    #[error("JaCoCo XML file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Report exists but could not be opened or read
    #[error("Error reading coverage data from {path}: {source}")]
    UnreadableReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report is not well-formed XML or carries invalid counter values
    #[error("Error parsing XML file {path}: {message}")]
    MalformedReport { path: PathBuf, message: String },

    /// Report parsed but holds no line counters at all
    #[error("No code coverage data found")]
    EmptyCoverage { aggregate: AggregateResult },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GateError>,
    },
}

impl GateError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GateError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        GateError::Usage {
            message: message.into(),
        }
    }

    /// Create a malformed report error
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GateError::MalformedReport {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The innermost error, looking through context wrappers.
    pub fn root(&self) -> &GateError {
        match self {
            GateError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Hint lines printed under the error, if any.
    pub fn hints(&self) -> &'static [&'static str] {
        match self.root() {
            GateError::EmptyCoverage { .. } => &[
                "No tests were executed",
                "JaCoCo agent was not properly configured",
                "No source code was instrumented",
            ],
            _ => &[],
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
