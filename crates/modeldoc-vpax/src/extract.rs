//! Entity and relationship extraction
//!
//! One pass over a loaded model document: build the identifier index, walk
//! the top-level `Tables` and `Relationships` sequences, and project every
//! resolved entity into a flat record. Field lookups all go through the
//! tolerant fallback accessors on [`Resolved`], so schema variation between
//! exporter versions and broken references degrade to sentinel defaults
//! instead of aborting the pass.

use modeldoc_core::records::{
    ColumnRecord, MeasureRecord, RelationshipRecord, TableRecord, UNKNOWN,
};
use serde_json::Value;

use crate::node::{resolve, IdentifierIndex, Resolved};

const TABLE_NAME_KEYS: &[&str] = &["TableName", "Name"];
const COLUMN_NAME_KEYS: &[&str] = &["ColumnName", "Name"];
const MEASURE_NAME_KEYS: &[&str] = &["MeasureName", "Name"];
const EXPRESSION_KEYS: &[&str] = &["MeasureExpression", "Expression"];
const CROSS_FILTERING_KEYS: &[&str] = &["CrossFilteringBehavior", "CrossFiltering"];

const CROSS_FILTERING_DEFAULT: &str = "single";
const CARDINALITY_SIDE_ABSENT: &str = "?";

/// The four flat record sets produced by one extraction pass
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub tables: Vec<TableRecord>,
    pub columns: Vec<ColumnRecord>,
    pub measures: Vec<MeasureRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

/// Extract all record sets from a loaded model document
pub fn extract(document: &Value) -> Extraction {
    let index = IdentifierIndex::build(document);
    let model = resolve(Some(document), &index);

    let mut out = Extraction::default();

    for entry in model.items("Tables") {
        let table = resolve(Some(entry), &index);
        let table_name = table.str_or(TABLE_NAME_KEYS, UNKNOWN);

        out.tables.push(TableRecord {
            name: table_name.clone(),
            is_hidden: table.bool_or("IsHidden", false),
        });

        for entry in table.items("Columns") {
            let column = resolve(Some(entry), &index);
            out.columns.push(column_record(&table_name, &column));
        }

        for entry in table.items("Measures") {
            let measure = resolve(Some(entry), &index);
            out.measures.push(measure_record(&table_name, &measure));
        }
    }

    for entry in model.items("Relationships") {
        let relationship = resolve(Some(entry), &index);
        out.relationships
            .push(relationship_record(&relationship, &index));
    }

    out
}

fn column_record(table_name: &str, column: &Resolved) -> ColumnRecord {
    // Calculated if either the type tag says so or the boolean flag is set
    let is_calculated =
        column.first_str(&["ColumnType"]) == Some("Calculated") || column.bool_or("IsCalculated", false);

    ColumnRecord {
        table: table_name.to_string(),
        name: column.str_or(COLUMN_NAME_KEYS, UNKNOWN),
        data_type: column.present_scalar_or(&["DataType"], UNKNOWN),
        is_calculated,
        source_column: column.present_scalar_or(&["SourceColumn"], ""),
        is_hidden: column.bool_or("IsHidden", false),
    }
}

fn measure_record(table_name: &str, measure: &Resolved) -> MeasureRecord {
    MeasureRecord {
        table: table_name.to_string(),
        name: measure.str_or(MEASURE_NAME_KEYS, UNKNOWN),
        expression: measure.str_or(EXPRESSION_KEYS, ""),
        format_string: measure.present_scalar_or(&["FormatString"], ""),
    }
}

/// Project one relationship through two levels of indirection:
/// relationship -> endpoint column -> owning table. A broken link at any
/// level leaves the sentinel on that field only.
fn relationship_record(relationship: &Resolved, index: &IdentifierIndex) -> RelationshipRecord {
    let from_column = resolve(relationship.get("FromColumn"), index);
    let to_column = resolve(relationship.get("ToColumn"), index);
    let from_table = resolve(from_column.get("Table"), index);
    let to_table = resolve(to_column.get("Table"), index);

    RelationshipRecord {
        from_table: from_table.str_or(TABLE_NAME_KEYS, UNKNOWN),
        from_column: from_column.str_or(COLUMN_NAME_KEYS, UNKNOWN),
        to_table: to_table.str_or(TABLE_NAME_KEYS, UNKNOWN),
        to_column: to_column.str_or(COLUMN_NAME_KEYS, UNKNOWN),
        cardinality: cardinality(relationship),
        cross_filtering: relationship
            .present_scalar_or(CROSS_FILTERING_KEYS, CROSS_FILTERING_DEFAULT),
    }
}

/// Cardinality precedence: typed endpoint fields win when either is
/// present ("?" stands in for the absent side), else the generic
/// `Cardinality` field, else the sentinel.
fn cardinality(relationship: &Resolved) -> String {
    let from = relationship.first_scalar(&["FromCardinalityType"]);
    let to = relationship.first_scalar(&["ToCardinalityType"]);

    if from.is_some() || to.is_some() {
        format!(
            "{}-{}",
            from.as_deref().unwrap_or(CARDINALITY_SIDE_ABSENT),
            to.as_deref().unwrap_or(CARDINALITY_SIDE_ABSENT)
        )
    } else {
        relationship.present_scalar_or(&["Cardinality"], UNKNOWN)
    }
}
