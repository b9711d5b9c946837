use super::StructureNode;

/// The metadata container for one digitized work.
///
/// Owns the root of the logical structure tree. Everything below the root is
/// owned by its parent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Record identifier, may be empty.
    pub id: String,
    pub root: StructureNode,
}

impl DocumentRecord {
    pub fn new(root: StructureNode) -> Self {
        Self {
            id: String::new(),
            root,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Total number of structure nodes in the record.
    pub fn node_count(&self) -> usize {
        self.root.iter_dfs().count()
    }
}
