//! Diagnostic codes and reporting
//!
//! Diagnostic codes are stable string identifiers carried in report.json.
//! Do not rename codes - only add new ones.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// Diagram rendering failed; the record sets are still valid
    GraphRenderFailed,

    /// General informational message
    Info,

    /// General warning message
    Warning,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GraphRenderFailed => "GRAPH_RENDER_FAILED",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic carried in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// What the diagnostic is about (file path, table name), if anything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            subject: None,
        }
    }

    /// Attach a subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {}: {} ({})", self.code, self.severity, self.message, subject),
            None => write!(f, "[{}] {}: {}", self.code, self.severity, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_strings_are_stable() {
        assert_eq!(DiagnosticCode::GraphRenderFailed.as_str(), "GRAPH_RENDER_FAILED");
        assert_eq!(DiagnosticCode::Info.as_str(), "INFO");
    }

    #[test]
    fn display_with_subject() {
        let diag = Diagnostic::new(
            DiagnosticCode::GraphRenderFailed,
            Severity::Warn,
            "could not write diagram",
        )
        .with_subject("model.dot");

        let text = diag.to_string();
        assert!(text.contains("GRAPH_RENDER_FAILED"));
        assert!(text.contains("model.dot"));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }
}
