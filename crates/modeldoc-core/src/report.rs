//! Report schema (stable v1)
//!
//! The report wraps the four flat record sets produced by one extraction
//! pass. This schema is versioned; breaking changes require a new version.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Severity};
use crate::records::{ColumnRecord, MeasureRecord, RelationshipRecord, TableRecord};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of tables extracted
    pub tables: usize,

    /// Number of columns extracted
    pub columns: usize,

    /// Number of measures extracted
    pub measures: usize,

    /// Number of relationships extracted
    pub relationships: usize,

    /// Number of warning diagnostics
    pub warnings: usize,
}

/// Extraction report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Source archive the model was read from
    pub source: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Flat record sets
    pub tables: Vec<TableRecord>,
    pub columns: Vec<ColumnRecord>,
    pub measures: Vec<MeasureRecord>,
    pub relationships: Vec<RelationshipRecord>,

    /// Diagnostics collected during the run
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Create a report from the record sets of one extraction pass
    pub fn from_records(
        source: impl Into<String>,
        tables: Vec<TableRecord>,
        columns: Vec<ColumnRecord>,
        measures: Vec<MeasureRecord>,
        relationships: Vec<RelationshipRecord>,
    ) -> Self {
        let summary = ReportSummary {
            tables: tables.len(),
            columns: columns.len(),
            measures: measures.len(),
            relationships: relationships.len(),
            warnings: 0,
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            summary,
            tables,
            columns,
            measures,
            relationships,
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity >= Severity::Warn {
            self.summary.warnings += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Check if the report carries any warnings
    pub fn has_warnings(&self) -> bool {
        self.summary.warnings > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::records::UNKNOWN;

    fn sample_report() -> Report {
        Report::from_records(
            "model.vpax",
            vec![TableRecord {
                name: "Orders".to_string(),
                is_hidden: false,
            }],
            vec![ColumnRecord {
                table: "Orders".to_string(),
                name: "ID".to_string(),
                data_type: UNKNOWN.to_string(),
                is_calculated: false,
                source_column: String::new(),
                is_hidden: false,
            }],
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn summary_counts_records() {
        let report = sample_report();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.tables, 1);
        assert_eq!(report.summary.columns, 1);
        assert_eq!(report.summary.measures, 0);
        assert!(!report.has_warnings());
    }

    #[test]
    fn warnings_are_counted() {
        let mut report = sample_report();
        report.add_diagnostic(Diagnostic::new(
            DiagnosticCode::GraphRenderFailed,
            Severity::Warn,
            "could not write diagram",
        ));
        report.add_diagnostic(Diagnostic::new(DiagnosticCode::Info, Severity::Info, "ok"));

        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report.has_warnings());
    }

    #[test]
    fn report_serialization() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"relationships\""));
        assert!(json.contains("\"Orders\""));
    }
}
