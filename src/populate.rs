//! Default-value population over a record's structure tree.
//!
//! Every field, person role and group that the display rules mark as
//! "default display" gets an entry on its node, so an editor always has
//! something to fill in. Existing fields and persons are kept; groups are
//! always appended.

use tracing::debug;

use crate::error::Result;
use crate::record::{MetadataField, MetadataGroup, PersonField, StructureNode};
use crate::rules::{DisplayRules, FieldDefinition, GroupDefinition};

/// Everything the populator needs besides the tree itself.
#[derive(Clone, Copy)]
pub struct PopulateContext<'a> {
    pub rules: &'a dyn DisplayRules,
    /// Identifier of the record being populated, for diagnostics.
    pub record_id: &'a str,
}

/// What a populate run added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateStats {
    pub nodes: usize,
    pub fields: usize,
    pub persons: usize,
    pub groups: usize,
}

impl<'a> PopulateContext<'a> {
    pub fn new(rules: &'a dyn DisplayRules) -> Self {
        Self {
            rules,
            record_id: "",
        }
    }

    pub fn with_record_id(mut self, record_id: &'a str) -> Self {
        self.record_id = record_id;
        self
    }
}

/// Materialize default-display entries on `node` and all its descendants.
///
/// Nodes are visited depth-first, parents before children. The first
/// resolution error aborts the whole walk; entries already added to earlier
/// nodes stay in the tree, so callers must discard it on error.
pub fn populate_defaults(
    node: &mut StructureNode,
    language: &str,
    context: &PopulateContext<'_>,
) -> Result<PopulateStats> {
    let mut stats = PopulateStats::default();
    populate_node(node, language, context, &mut stats)?;
    Ok(stats)
}

fn populate_node(
    node: &mut StructureNode,
    language: &str,
    context: &PopulateContext<'_>,
    stats: &mut PopulateStats,
) -> Result<()> {
    let rules = context.rules;
    stats.nodes += 1;

    let fields = rules.fields_for_default_display(node, language)?;
    for definition in fields {
        if node.has_metadata(&definition.name) {
            continue;
        }
        node.metadata.push(new_field(&definition));
        stats.fields += 1;
    }

    let persons = rules.person_fields_for_default_display(node, language)?;
    for definition in persons {
        if node.has_person(&definition.name) {
            continue;
        }
        node.persons.push(PersonField::empty(definition.name));
        stats.persons += 1;
    }

    // Groups are not deduplicated: a second run appends another copy.
    let groups = rules.groups_for_default_display(node, language)?;
    for definition in &groups {
        node.groups.push(new_group(definition));
        stats.groups += 1;
    }

    debug!(
        record = context.record_id,
        node_type = %node.node_type,
        groups = groups.len(),
        "populated node defaults"
    );

    for child in &mut node.children {
        populate_node(child, language, context, stats)?;
    }

    Ok(())
}

fn new_field(definition: &FieldDefinition) -> MetadataField {
    let mut field = MetadataField::empty(&definition.name);
    definition.select_first_allowed(&mut field);
    field
}

fn new_group(definition: &GroupDefinition) -> MetadataGroup {
    let mut group = MetadataGroup::new(&definition.name);

    for member in &definition.fields {
        let value = match member.default_value.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => "",
        };
        group.fields.push(MetadataField::new(&member.name, value));
    }

    for (field, member) in group.fields.iter_mut().zip(&definition.fields) {
        member.select_first_allowed(field);
    }

    group
}
