//! Modeldoc VPAX
//!
//! Extraction core: opens a VPAX archive, resolves the `$id`/`$ref`
//! indirection inside its model document, and flattens the model into the
//! record sets defined by `modeldoc-core`.

pub mod container;
pub mod extract;
pub mod graph;
pub mod node;

pub use container::{ArchiveError, ContainerLimits, VpaxContainer};
pub use extract::{extract, Extraction};
pub use graph::{GraphEdge, ModelGraph};
pub use node::{resolve, IdentifierIndex, NodeId, RawNode, Resolved};
