//! Descriptive-metadata records and their logical structure tree.
//!
//! This module contains:
//! - The record container and its logical structure tree
//! - Metadata, person and group values attached to structure nodes

mod document;
mod field;
mod node;

pub use document::DocumentRecord;
pub use field::{MetadataField, MetadataGroup, PersonField};
pub use node::{DfsIter, StructureNode};
