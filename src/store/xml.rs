//! Record files in a compact XML dialect.
//!
//! ```xml
//! <record id="ppn123">
//!   <struct type="Monograph">
//!     <metadata type="TitleDocMain">Faust</metadata>
//!     <person role="Author" given="Johann Wolfgang" family="Goethe" identifier=""/>
//!     <group type="Citation">
//!       <metadata type="Source"></metadata>
//!     </group>
//!     <struct type="Chapter"/>
//!   </struct>
//! </record>
//! ```

use std::io;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::{DocumentRecord, MetadataField, MetadataGroup, PersonField, StructureNode};
use crate::util::{escape_xml, resolve_entity, strip_bom};

/// A record stored as an XML file on disk.
#[derive(Debug, Clone)]
pub struct XmlFileStore {
    path: PathBuf,
}

impl XmlFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl RecordStore for XmlFileStore {
    fn read_record(&self) -> Result<DocumentRecord> {
        let bytes = std::fs::read(&self.path).map_err(|e| storage_error(&self.path, e))?;
        let content = std::str::from_utf8(strip_bom(&bytes))
            .map_err(|e| Error::Read(format!("{} is not UTF-8: {e}", self.path.display())))?;

        let record = parse_record_xml(content)?;
        debug!(path = %self.path.display(), nodes = record.node_count(), "read record");
        Ok(record)
    }

    fn write_record(&self, record: &DocumentRecord) -> Result<()> {
        let xml = write_record_xml(record);

        // Write next to the target and rename, so a failed write never
        // leaves a truncated record behind.
        let temp = self.temp_path();
        std::fs::write(&temp, xml).map_err(|e| storage_error(&temp, e))?;
        std::fs::rename(&temp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            Error::Write(format!("cannot replace {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), "wrote record");
        Ok(())
    }
}

fn storage_error(path: &Path, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            Error::StorageUnavailable(format!("{}: {err}", path.display()))
        }
        _ => Error::Io(err),
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Parse a record from its XML text.
pub fn parse_record_xml(content: &str) -> Result<DocumentRecord> {
    let mut reader = Reader::from_str(content);
    let mut builder = RecordBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => builder.open(&e)?,
            Ok(Event::Empty(e)) => {
                builder.open(&e)?;
                builder.close(e.name().as_ref())?;
            }
            Ok(Event::End(e)) => builder.close(e.name().as_ref())?,
            Ok(Event::Text(e)) => builder.text(&String::from_utf8_lossy(&e))?,
            Ok(Event::CData(e)) => builder.text(&String::from_utf8_lossy(&e))?,
            Ok(Event::GeneralRef(e)) => {
                let entity = String::from_utf8_lossy(&e);
                match resolve_entity(&entity) {
                    Some(resolved) => builder.text(&resolved)?,
                    None => {
                        return Err(Error::Read(format!("unknown entity '&{entity};'")));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Read(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    builder.finish()
}

/// Incremental tree construction from reader events.
#[derive(Default)]
struct RecordBuilder {
    id: String,
    root: Option<StructureNode>,
    /// Open structure nodes, innermost last.
    stack: Vec<StructureNode>,
    group: Option<MetadataGroup>,
    /// Type and collected text of the open metadata element.
    metadata: Option<(String, String)>,
}

impl RecordBuilder {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = e.name();
        let element = String::from_utf8_lossy(name.as_ref());

        // Metadata values are plain text, and groups hold only metadata.
        if self.metadata.is_some() {
            return Err(Error::Read(format!("<{element}> inside <metadata>")));
        }
        if self.group.is_some() && name.as_ref() != b"metadata" {
            return Err(Error::Read(format!("<{element}> inside <group>")));
        }

        match name.as_ref() {
            b"record" => {
                self.id = attribute(e, b"id")?.unwrap_or_default();
            }
            b"struct" => {
                let node_type = required_attribute(e, b"type", "struct")?;
                self.stack.push(StructureNode::new(node_type));
            }
            b"metadata" => {
                let field_type = required_attribute(e, b"type", "metadata")?;
                self.metadata = Some((field_type, String::new()));
            }
            b"person" => {
                let person = PersonField {
                    role: required_attribute(e, b"role", "person")?,
                    given_name: attribute(e, b"given")?.unwrap_or_default(),
                    family_name: attribute(e, b"family")?.unwrap_or_default(),
                    identifier: attribute(e, b"identifier")?.unwrap_or_default(),
                };
                self.current_node("person")?.persons.push(person);
            }
            b"group" => {
                let group_type = required_attribute(e, b"type", "group")?;
                self.group = Some(MetadataGroup::new(group_type));
            }
            _ => return Err(Error::Read(format!("unexpected element <{element}>"))),
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        match name {
            b"struct" => {
                let node = self
                    .stack
                    .pop()
                    .ok_or_else(|| Error::Read("unbalanced </struct>".into()))?;
                match self.stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None if self.root.is_none() => self.root = Some(node),
                    None => return Err(Error::Read("record has more than one root structure".into())),
                }
            }
            b"metadata" => {
                if let Some((field_type, value)) = self.metadata.take() {
                    let field = MetadataField::new(field_type, value);
                    match self.group.as_mut() {
                        Some(group) => group.fields.push(field),
                        None => self.current_node("metadata")?.metadata.push(field),
                    }
                }
            }
            b"group" => {
                if let Some(group) = self.group.take() {
                    self.current_node("group")?.groups.push(group);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.metadata.as_mut() {
            Some((_, value)) => value.push_str(text),
            None if text.trim().is_empty() => {}
            None => {
                return Err(Error::Read(format!(
                    "text '{}' outside of <metadata>",
                    text.trim()
                )));
            }
        }
        Ok(())
    }

    fn current_node(&mut self, element: &str) -> Result<&mut StructureNode> {
        self.stack
            .last_mut()
            .ok_or_else(|| Error::Read(format!("<{element}> outside of a <struct>")))
    }

    fn finish(self) -> Result<DocumentRecord> {
        if !self.stack.is_empty() {
            return Err(Error::Read("unclosed <struct> at end of file".into()));
        }
        let root = self
            .root
            .ok_or_else(|| Error::Read("record has no root structure".into()))?;
        Ok(DocumentRecord::new(root).with_id(self.id))
    }
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    // Walk every attribute so duplicates after the match are still reported.
    let mut found = None;
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::Read(format!("malformed attribute: {err}")))?;
        if found.is_none() && attr.key.as_ref() == name {
            let raw = std::str::from_utf8(attr.value.as_ref())
                .map_err(|err| Error::Read(format!("attribute is not UTF-8: {err}")))?;
            let value = unescape(raw)
                .map_err(|err| Error::Read(format!("invalid attribute value '{raw}': {err}")))?;
            found = Some(value.into_owned());
        }
    }
    Ok(found)
}

fn required_attribute(e: &BytesStart<'_>, name: &[u8], element: &str) -> Result<String> {
    attribute(e, name)?.ok_or_else(|| {
        Error::Read(format!(
            "<{element}> without '{}' attribute",
            String::from_utf8_lossy(name)
        ))
    })
}

// ============================================================================
// Writing
// ============================================================================

/// Serialize a record to XML text.
pub fn write_record_xml(record: &DocumentRecord) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<record id=\"{}\">\n", escape_xml(&record.id)));
    write_node(&mut xml, &record.root, 1);
    xml.push_str("</record>\n");
    xml
}

fn write_node(xml: &mut String, node: &StructureNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let empty = node.metadata.is_empty()
        && node.persons.is_empty()
        && node.groups.is_empty()
        && node.children.is_empty();

    if empty {
        xml.push_str(&format!(
            "{indent}<struct type=\"{}\"/>\n",
            escape_xml(&node.node_type)
        ));
        return;
    }

    xml.push_str(&format!(
        "{indent}<struct type=\"{}\">\n",
        escape_xml(&node.node_type)
    ));

    for field in &node.metadata {
        write_metadata(xml, field, depth + 1);
    }

    for person in &node.persons {
        xml.push_str(&format!(
            "{indent}  <person role=\"{}\" given=\"{}\" family=\"{}\" identifier=\"{}\"/>\n",
            escape_xml(&person.role),
            escape_xml(&person.given_name),
            escape_xml(&person.family_name),
            escape_xml(&person.identifier)
        ));
    }

    for group in &node.groups {
        xml.push_str(&format!(
            "{indent}  <group type=\"{}\">\n",
            escape_xml(&group.group_type)
        ));
        for field in &group.fields {
            write_metadata(xml, field, depth + 2);
        }
        xml.push_str(&format!("{indent}  </group>\n"));
    }

    for child in &node.children {
        write_node(xml, child, depth + 1);
    }

    xml.push_str(&format!("{indent}</struct>\n"));
}

fn write_metadata(xml: &mut String, field: &MetadataField, depth: usize) {
    // Empty values keep an explicit open/close pair so they stay distinct
    // from a missing element when diffing files.
    xml.push_str(&format!(
        "{}<metadata type=\"{}\">{}</metadata>\n",
        "  ".repeat(depth),
        escape_xml(&field.field_type),
        escape_xml(&field.value)
    ));
}
