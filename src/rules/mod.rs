//! Display rules: which fields, person roles and groups a structure node
//! must always show, even when empty.
//!
//! The populator only talks to the [`DisplayRules`] trait. [`Ruleset`] is a
//! data-driven implementation read from JSON; a hosting workflow engine can
//! provide its own.

mod ruleset;

use serde::Deserialize;

use crate::error::Result;
use crate::record::{MetadataField, StructureNode};

pub use ruleset::{AllowedEntry, GroupMember, GroupType, MetadataType, Ruleset, StructType};

/// Read-only queries for default-display definitions.
///
/// Each query returns every definition flagged default-display for the
/// node's structure type, whether or not the node already carries a value of
/// that type. An error means the ruleset cannot describe the node at all.
pub trait DisplayRules {
    /// Plain metadata types shown by default on `node`.
    fn fields_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<FieldDefinition>>;

    /// Person roles shown by default on `node`.
    fn person_fields_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<FieldDefinition>>;

    /// Metadata groups shown by default on `node`.
    fn groups_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<GroupDefinition>>;
}

/// Value constraint of a metadata type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// One of a fixed list of values.
    Choice { options: Vec<String> },
}

/// A resolved metadata (or person role) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    /// Display label in the requested language.
    pub label: String,
    pub kind: FieldKind,
    /// Preset value, only meaningful for fields inside a group.
    pub default_value: Option<String>,
}

/// A resolved metadata group definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDefinition {
    pub name: String,
    pub label: String,
    pub fields: Vec<FieldDefinition>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind: FieldKind::Text,
            default_value: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = FieldKind::Choice {
            options: options.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Make sure a constrained-choice field holds one of its allowed options.
    ///
    /// A value outside the option list (including the empty value of a fresh
    /// field) is replaced by the first option. Text fields are left alone.
    pub fn select_first_allowed(&self, field: &mut MetadataField) {
        if let FieldKind::Choice { options } = &self.kind
            && !options.iter().any(|o| *o == field.value)
            && let Some(first) = options.first()
        {
            field.value = first.clone();
        }
    }
}

impl GroupDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_takes_first_option() {
        let def = FieldDefinition::new("DocLanguage").with_options(["ger", "eng"]);
        let mut field = MetadataField::empty("DocLanguage");
        def.select_first_allowed(&mut field);
        assert_eq!(field.value, "ger");
    }

    #[test]
    fn test_choice_keeps_allowed_value() {
        let def = FieldDefinition::new("DocLanguage").with_options(["ger", "eng"]);
        let mut field = MetadataField::new("DocLanguage", "eng");
        def.select_first_allowed(&mut field);
        assert_eq!(field.value, "eng");
    }

    #[test]
    fn test_text_field_untouched() {
        let def = FieldDefinition::new("TitleDocMain");
        let mut field = MetadataField::empty("TitleDocMain");
        def.select_first_allowed(&mut field);
        assert_eq!(field.value, "");
    }

    #[test]
    fn test_empty_choice_list_leaves_value() {
        let def = FieldDefinition::new("Shelfmark").with_options(Vec::<String>::new());
        let mut field = MetadataField::empty("Shelfmark");
        def.select_first_allowed(&mut field);
        assert_eq!(field.value, "");
    }
}
