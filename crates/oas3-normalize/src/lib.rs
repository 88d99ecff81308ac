#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
//! Normalization of OpenAPI documents held as possibly cyclic graphs.
//!
//! - [`cycles`] turns a cyclic [`DocumentGraph`] back into acyclic JSON with `$ref` pointers.
//! - [`resolver`] follows pointers, shallowly or through a whole graph.
//! - [`merge`] combines several documents and reports every naming conflict.
//! - [`upgrade`] rewrites an OpenAPI 3.0 document into 3.1.

pub mod category;
pub mod cycles;
pub mod document;
pub mod merge;
pub mod pointer;
pub mod resolver;
pub mod upgrade;

pub use category::ComponentCategory;
pub use cycles::{CycleReport, HoistedSlot, break_cycles, break_cycles_with_report};
pub use document::{DocumentGraph, EdgeKey, GraphError, Node, NodeId, Value};
pub use merge::{ConflictRecord, MergeConflict, MergeOptions, merge};
pub use pointer::link_references;
pub use resolver::{resolve, resolve_deep};
pub use upgrade::{UpgradeOutcome, is_schema_path, upgrade, upgrade_with_outcome};
