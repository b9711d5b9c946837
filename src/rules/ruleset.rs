//! Data-driven display rules read from a JSON ruleset description.
//!
//! ```json
//! {
//!   "metadata_types": [
//!     { "name": "TitleDocMain", "labels": { "de": "Haupttitel", "en": "Main title" } },
//!     { "name": "DocLanguage", "kind": { "type": "choice", "options": ["ger", "eng"] } },
//!     { "name": "Author", "person": true }
//!   ],
//!   "group_types": [
//!     { "name": "Citation", "fields": [{ "type": "Source" }, { "type": "Page" }] }
//!   ],
//!   "struct_types": [
//!     {
//!       "name": "Monograph",
//!       "metadata": [{ "type": "TitleDocMain", "default_display": true }],
//!       "groups": [{ "type": "Citation", "default_display": true }]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{DisplayRules, FieldDefinition, FieldKind, GroupDefinition};
use crate::error::{Error, Result};
use crate::record::StructureNode;

/// A ruleset: the declared metadata, group and structure types.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ruleset {
    #[serde(default)]
    pub metadata_types: Vec<MetadataType>,
    #[serde(default)]
    pub group_types: Vec<GroupType>,
    #[serde(default)]
    pub struct_types: Vec<StructType>,
}

/// A declared metadata type. Person roles are metadata types with `person` set.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataType {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub person: bool,
}

/// A declared metadata group type.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupType {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub fields: Vec<GroupMember>,
}

/// A metadata type inside a group, with an optional preset value.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMember {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub default: Option<String>,
}

/// A declared structure type and what may be attached to it.
#[derive(Debug, Clone, Deserialize)]
pub struct StructType {
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub metadata: Vec<AllowedEntry>,
    #[serde(default)]
    pub groups: Vec<AllowedEntry>,
}

/// A metadata or group type allowed on a structure type.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowedEntry {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default)]
    pub default_display: bool,
}

impl Ruleset {
    /// Parse a ruleset from its JSON description.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a ruleset file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn struct_type(&self, name: &str) -> Option<&StructType> {
        self.struct_types.iter().find(|t| t.name == name)
    }

    pub fn metadata_type(&self, name: &str) -> Option<&MetadataType> {
        self.metadata_types.iter().find(|t| t.name == name)
    }

    pub fn group_type(&self, name: &str) -> Option<&GroupType> {
        self.group_types.iter().find(|t| t.name == name)
    }

    /// Label of a structure type in `language`, falling back to its name.
    pub fn struct_label<'a>(&'a self, name: &'a str, language: &str) -> &'a str {
        self.struct_type(name)
            .and_then(|t| t.labels.get(language))
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Label of a metadata type or person role in `language`.
    pub fn metadata_label<'a>(&'a self, name: &'a str, language: &str) -> &'a str {
        self.metadata_type(name)
            .and_then(|t| t.labels.get(language))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn group_label<'a>(&'a self, name: &'a str, language: &str) -> &'a str {
        self.group_type(name)
            .and_then(|t| t.labels.get(language))
            .map(String::as_str)
            .unwrap_or(name)
    }

    fn resolve_struct(&self, node: &StructureNode) -> Result<&StructType> {
        self.struct_type(&node.node_type).ok_or_else(|| {
            Error::resolution(&node.node_type, "structure type is not declared")
        })
    }

    fn resolve_metadata(&self, node: &StructureNode, name: &str) -> Result<&MetadataType> {
        self.metadata_type(name).ok_or_else(|| {
            Error::resolution(
                &node.node_type,
                format!("metadata type '{name}' is not declared"),
            )
        })
    }

    /// Default-display metadata entries of the node's type, split by the
    /// person flag of their declared metadata type.
    fn default_metadata(
        &self,
        node: &StructureNode,
        language: &str,
        person: bool,
    ) -> Result<Vec<FieldDefinition>> {
        let struct_type = self.resolve_struct(node)?;
        let mut definitions = Vec::new();

        for entry in struct_type.metadata.iter().filter(|e| e.default_display) {
            let metadata_type = self.resolve_metadata(node, &entry.name)?;
            if metadata_type.person == person {
                definitions.push(metadata_type.definition(language));
            }
        }

        Ok(definitions)
    }
}

impl MetadataType {
    fn definition(&self, language: &str) -> FieldDefinition {
        FieldDefinition {
            name: self.name.clone(),
            label: label_for(&self.labels, &self.name, language),
            kind: self.kind.clone(),
            default_value: None,
        }
    }
}

impl DisplayRules for Ruleset {
    fn fields_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<FieldDefinition>> {
        self.default_metadata(node, language, false)
    }

    fn person_fields_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<FieldDefinition>> {
        self.default_metadata(node, language, true)
    }

    fn groups_for_default_display(
        &self,
        node: &StructureNode,
        language: &str,
    ) -> Result<Vec<GroupDefinition>> {
        let struct_type = self.resolve_struct(node)?;
        let mut definitions = Vec::new();

        for entry in struct_type.groups.iter().filter(|e| e.default_display) {
            let group_type = self.group_type(&entry.name).ok_or_else(|| {
                Error::resolution(
                    &node.node_type,
                    format!("group type '{}' is not declared", entry.name),
                )
            })?;

            let mut fields = Vec::with_capacity(group_type.fields.len());
            for member in &group_type.fields {
                let mut field = self
                    .resolve_metadata(node, &member.field_type)?
                    .definition(language);
                field.default_value = member.default.clone();
                fields.push(field);
            }

            definitions.push(GroupDefinition {
                name: group_type.name.clone(),
                label: label_for(&group_type.labels, &group_type.name, language),
                fields,
            });
        }

        Ok(definitions)
    }
}

fn label_for(labels: &HashMap<String, String>, name: &str, language: &str) -> String {
    labels
        .get(language)
        .cloned()
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULESET: &str = r#"{
        "metadata_types": [
            { "name": "TitleDocMain", "labels": { "de": "Haupttitel", "en": "Main title" } },
            { "name": "DocLanguage", "kind": { "type": "choice", "options": ["ger", "eng"] } },
            { "name": "PublicationYear" },
            { "name": "Author", "person": true, "labels": { "de": "Autor" } },
            { "name": "Source" },
            { "name": "Page" }
        ],
        "group_types": [
            { "name": "Citation", "fields": [{ "type": "Source" }, { "type": "Page", "default": "1" }] }
        ],
        "struct_types": [
            {
                "name": "Monograph",
                "labels": { "de": "Monographie" },
                "metadata": [
                    { "type": "TitleDocMain", "default_display": true },
                    { "type": "DocLanguage", "default_display": true },
                    { "type": "PublicationYear" },
                    { "type": "Author", "default_display": true }
                ]
            },
            {
                "name": "Chapter",
                "groups": [{ "type": "Citation", "default_display": true }]
            },
            {
                "name": "Broken",
                "metadata": [{ "type": "Nonexistent", "default_display": true }]
            }
        ]
    }"#;

    fn ruleset() -> Ruleset {
        Ruleset::from_json_str(RULESET).unwrap()
    }

    #[test]
    fn test_fields_exclude_persons_and_non_default() {
        let rules = ruleset();
        let node = StructureNode::new("Monograph");
        let fields = rules.fields_for_default_display(&node, "de").unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["TitleDocMain", "DocLanguage"]);
        assert_eq!(fields[0].label, "Haupttitel");
        assert!(matches!(fields[1].kind, FieldKind::Choice { .. }));
    }

    #[test]
    fn test_person_fields() {
        let rules = ruleset();
        let node = StructureNode::new("Monograph");
        let persons = rules.person_fields_for_default_display(&node, "de").unwrap();
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Author");
        assert_eq!(persons[0].label, "Autor");
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let rules = ruleset();
        let node = StructureNode::new("Monograph");
        let persons = rules.person_fields_for_default_display(&node, "fr").unwrap();
        assert_eq!(persons[0].label, "Author");
        assert_eq!(rules.struct_label("Monograph", "de"), "Monographie");
        assert_eq!(rules.struct_label("Chapter", "de"), "Chapter");
    }

    #[test]
    fn test_display_labels() {
        let rules = ruleset();
        assert_eq!(rules.metadata_label("TitleDocMain", "en"), "Main title");
        assert_eq!(rules.metadata_label("Author", "de"), "Autor");
        assert_eq!(rules.metadata_label("Author", "en"), "Author");
        assert_eq!(rules.metadata_label("Undeclared", "de"), "Undeclared");
        assert_eq!(rules.group_label("Citation", "de"), "Citation");
    }

    #[test]
    fn test_groups_carry_member_defaults() {
        let rules = ruleset();
        let node = StructureNode::new("Chapter");
        let groups = rules.groups_for_default_display(&node, "en").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Citation");
        assert_eq!(groups[0].fields[0].default_value, None);
        assert_eq!(groups[0].fields[1].default_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_unknown_struct_type_fails() {
        let rules = ruleset();
        let node = StructureNode::new("Periodical");
        let err = rules.fields_for_default_display(&node, "de").unwrap_err();
        assert!(matches!(err, Error::Resolution { ref node_type, .. } if node_type == "Periodical"));
    }

    #[test]
    fn test_undeclared_metadata_type_fails() {
        let rules = ruleset();
        let node = StructureNode::new("Broken");
        let err = rules.fields_for_default_display(&node, "de").unwrap_err();
        assert!(err.to_string().contains("Nonexistent"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Ruleset::from_json_str("{ not json"),
            Err(Error::Json(_))
        ));
    }
}
