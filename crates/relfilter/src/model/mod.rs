//! Models, relation descriptors, and the graph lookup seam.

mod entity;
mod graph;
mod relation;


pub use entity::ModelDef;
pub use graph::{RelationGraph, SchemaGraph};
pub use relation::{RelationDescriptor, RelationKind};
