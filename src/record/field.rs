/// A single metadata value of a ruleset-defined type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    pub field_type: String,
    pub value: String,
}

/// A personal name in a ruleset-defined role (author, editor, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonField {
    pub role: String,
    pub given_name: String,
    pub family_name: String,
    pub identifier: String,
}

/// A bundle of metadata values that belong together, e.g. a citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataGroup {
    pub group_type: String,
    pub fields: Vec<MetadataField>,
}

impl MetadataField {
    pub fn new(field_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            value: value.into(),
        }
    }

    /// A field with an empty value.
    pub fn empty(field_type: impl Into<String>) -> Self {
        Self::new(field_type, "")
    }
}

impl PersonField {
    /// A person entry with only its role set.
    pub fn empty(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        self.given_name = given_name.into();
        self.family_name = family_name.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}

impl MetadataGroup {
    pub fn new(group_type: impl Into<String>) -> Self {
        Self {
            group_type: group_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: MetadataField) -> Self {
        self.fields.push(field);
        self
    }

    /// First field of the given type inside the group.
    pub fn field(&self, field_type: &str) -> Option<&MetadataField> {
        self.fields.iter().find(|f| f.field_type == field_type)
    }
}
