//! Modeldoc Core
//!
//! Stable domain types shared by the extraction pipeline and its consumers:
//! flat record types, the diagnostic vocabulary, the versioned report
//! schema, and the TOML configuration schema.

pub mod config;
pub mod diagnostic;
pub mod records;
pub mod report;

pub use config::{Config, ConfigError, ContainerLimitsConfig, GraphConfig};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use records::{ColumnRecord, MeasureRecord, RelationshipRecord, TableRecord, UNKNOWN};
pub use report::{Report, ReportSummary, ReportVersion};
