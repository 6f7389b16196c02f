//! Flat record types produced by one extraction pass
//!
//! Each record is a fully-resolved projection of the source model: owned
//! strings, no references back into the raw document. Downstream writers
//! consume these as-is and perform no further resolution.

use serde::{Deserialize, Serialize};

/// Sentinel substituted when a required field cannot be recovered from the
/// source model (missing field, dangling reference).
pub const UNKNOWN: &str = "Unknown";

/// A table in the semantic model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table name (identity within one document)
    pub name: String,

    /// Whether the table is hidden from report authors
    pub is_hidden: bool,
}

/// A column, always owned by exactly one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Owning table name
    pub table: String,

    /// Column name
    pub name: String,

    /// Declared data type
    pub data_type: String,

    /// Whether the column is calculated rather than sourced
    pub is_calculated: bool,

    /// Source column in the underlying data, if any
    pub source_column: String,

    /// Whether the column is hidden
    pub is_hidden: bool,
}

/// A measure, owned by a table like a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureRecord {
    /// Owning table name
    pub table: String,

    /// Measure name
    pub name: String,

    /// Measure expression (DAX)
    pub expression: String,

    /// Display format string, if any
    pub format_string: String,
}

/// A directed edge between two (table, column) pairs
///
/// Derived record: it references the endpoint pairs by name and does not own
/// them. Endpoints that could not be resolved carry the `UNKNOWN` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,

    /// Cardinality descriptor, e.g. "One-Many"
    pub cardinality: String,

    /// Cross-filtering behavior, e.g. "single"
    pub cross_filtering: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_flat() {
        let column = ColumnRecord {
            table: "Orders".to_string(),
            name: "ID".to_string(),
            data_type: UNKNOWN.to_string(),
            is_calculated: false,
            source_column: String::new(),
            is_hidden: false,
        };

        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["table"], "Orders");
        assert_eq!(json["data_type"], "Unknown");
        assert_eq!(json["is_calculated"], false);
    }

    #[test]
    fn relationship_roundtrip() {
        let rel = RelationshipRecord {
            from_table: "Sales".to_string(),
            from_column: "CustomerId".to_string(),
            to_table: "Customers".to_string(),
            to_column: "Id".to_string(),
            cardinality: "Many-One".to_string(),
            cross_filtering: "single".to_string(),
        };

        let json = serde_json::to_string(&rel).unwrap();
        let parsed: RelationshipRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rel, parsed);
    }
}
