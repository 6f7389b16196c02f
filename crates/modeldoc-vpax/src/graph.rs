//! Table graph construction and DOT emission
//!
//! A pure projection over the extracted records: one node per distinct
//! table name, one labeled directed edge per relationship. Rebuilt in full
//! on every extraction run. The graph is a rendering convenience; a failure
//! to write the DOT output is reported as a warning by the caller, never
//! propagated as a pipeline error.

use std::collections::HashSet;

use modeldoc_core::records::{RelationshipRecord, TableRecord};

/// One labeled directed edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Directed graph of tables linked by relationships
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    nodes: Vec<String>,
    edges: Vec<GraphEdge>,
}

impl ModelGraph {
    /// Build the graph from the extracted record sets.
    ///
    /// Relationship endpoints naming tables absent from the table list
    /// still become nodes. Parallel edges between the same pair of tables
    /// stay distinct; no deduplication, no cycle handling.
    pub fn build(tables: &[TableRecord], relationships: &[RelationshipRecord]) -> Self {
        let mut nodes = Vec::new();
        let mut seen = HashSet::new();
        let mut add_node = |nodes: &mut Vec<String>, name: &str| {
            if seen.insert(name.to_string()) {
                nodes.push(name.to_string());
            }
        };

        for table in tables {
            add_node(&mut nodes, &table.name);
        }

        let mut edges = Vec::with_capacity(relationships.len());
        for relationship in relationships {
            add_node(&mut nodes, &relationship.from_table);
            add_node(&mut nodes, &relationship.to_table);

            edges.push(GraphEdge {
                from: relationship.from_table.clone(),
                to: relationship.to_table.clone(),
                label: format!(
                    "{} → {} ({})",
                    relationship.from_column, relationship.to_column, relationship.cardinality
                ),
            });
        }

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Render as Graphviz DOT text
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph model {\n");
        dot.push_str(
            "    node [shape=box, style=\"rounded,filled\", color=lightblue2, fontname=\"Helvetica\"];\n",
        );

        for node in &self.nodes {
            dot.push_str(&format!("    \"{}\";\n", dot_escape(node)));
        }

        for edge in &self.edges {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\"];\n",
                dot_escape(&edge.from),
                dot_escape(&edge.to),
                dot_escape(&edge.label)
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
