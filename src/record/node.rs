use super::{MetadataField, MetadataGroup, PersonField};

/// One level of the logical hierarchy of a work (volume, chapter, page, ...).
///
/// A node owns its children, so a record's structure is always a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureNode {
    /// Ruleset structure type, e.g. `"Monograph"` or `"Chapter"`.
    pub node_type: String,
    pub children: Vec<StructureNode>,
    pub metadata: Vec<MetadataField>,
    pub persons: Vec<PersonField>,
    pub groups: Vec<MetadataGroup>,
}

impl StructureNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            children: Vec::new(),
            metadata: Vec::new(),
            persons: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: StructureNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_metadata(mut self, field: MetadataField) -> Self {
        self.metadata.push(field);
        self
    }

    pub fn with_person(mut self, person: PersonField) -> Self {
        self.persons.push(person);
        self
    }

    pub fn with_group(mut self, group: MetadataGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Whether a metadata value of this type is attached.
    pub fn has_metadata(&self, field_type: &str) -> bool {
        self.metadata.iter().any(|m| m.field_type == field_type)
    }

    /// Whether a person in this role is attached.
    pub fn has_person(&self, role: &str) -> bool {
        self.persons.iter().any(|p| p.role == role)
    }

    /// All metadata values of the given type, in attachment order.
    pub fn metadata_of<'a>(&'a self, field_type: &'a str) -> impl Iterator<Item = &'a MetadataField> {
        self.metadata.iter().filter(move |m| m.field_type == field_type)
    }

    /// All groups of the given type, in attachment order.
    pub fn groups_of<'a>(&'a self, group_type: &'a str) -> impl Iterator<Item = &'a MetadataGroup> {
        self.groups.iter().filter(move |g| g.group_type == group_type)
    }

    /// Iterate over this node and all descendants, parents before children.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        DfsIter { stack: vec![self] }
    }
}

/// Pre-order depth-first iterator over a structure subtree.
pub struct DfsIter<'a> {
    stack: Vec<&'a StructureNode>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a StructureNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(current.children.iter().rev());

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dfs_is_pre_order() {
        let tree = StructureNode::new("Monograph")
            .with_child(
                StructureNode::new("Chapter")
                    .with_child(StructureNode::new("Section"))
                    .with_child(StructureNode::new("Figure")),
            )
            .with_child(StructureNode::new("Index"));

        let order: Vec<_> = tree.iter_dfs().map(|n| n.node_type.as_str()).collect();
        assert_eq!(order, vec!["Monograph", "Chapter", "Section", "Figure", "Index"]);
    }

    #[test]
    fn test_presence_lookups() {
        let node = StructureNode::new("Monograph")
            .with_metadata(MetadataField::new("TitleDocMain", "Faust"))
            .with_person(PersonField::empty("Author"));

        assert!(node.has_metadata("TitleDocMain"));
        assert!(!node.has_metadata("DocLanguage"));
        assert!(node.has_person("Author"));
        assert!(!node.has_person("Editor"));
        assert_eq!(node.metadata_of("TitleDocMain").count(), 1);
    }
}
