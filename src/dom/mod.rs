//! Element tree: slotmap-backed arena with tree operations and selector
//! queries.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{ElementData, ElementId};
pub use tree::Dom;
