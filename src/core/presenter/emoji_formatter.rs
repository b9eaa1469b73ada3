//! Emoji Formatter Module
//!
//! Provides consistent emoji usage across the gate output.
//! The plain theme swaps every emoji for a bracketed tag so CI logs that
//! cannot render emoji stay readable.

// =============================================================================
// Theme
// =============================================================================

/// Visual theme for emoji output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Full emoji support (default)
    #[default]
    Full,
    /// No emojis (plain text)
    Plain,
}

// =============================================================================
// Emoji Formatter
// =============================================================================

/// Formats output with consistent emoji usage.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiFormatter {
    theme: Theme,
}

impl EmojiFormatter {
    /// Create a new emoji formatter with default theme.
    pub fn new() -> Self {
        Self { theme: Theme::Full }
    }

    /// Create a formatter with a specific theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Emoji for the "analyzing report" line.
    pub fn scan(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[SCAN]",
            Theme::Full => "🔍",
        }
    }

    /// Emoji for the coverage report header.
    pub fn report(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[REPORT]",
            Theme::Full => "📊",
        }
    }

    /// Emoji for the quality gate header.
    pub fn gate(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[GATE]",
            Theme::Full => "🎯",
        }
    }

    // =========================================================================
    // Status Indicators
    // =========================================================================

    /// Success indicator.
    pub fn success(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[PASS]",
            Theme::Full => "✅",
        }
    }

    /// Warning indicator (emoji form includes a trailing space).
    pub fn warning(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[WARN]",
            Theme::Full => "⚠️ ",
        }
    }

    /// Error indicator.
    pub fn error(&self) -> &'static str {
        match self.theme {
            Theme::Plain => "[FAIL]",
            Theme::Full => "❌",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
