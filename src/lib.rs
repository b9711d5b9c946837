//! # metscreation
//!
//! A workflow step that prepares a digitized work's descriptive-metadata
//! record for editing: every metadata field, person role and metadata group
//! the ruleset marks as "default display" is created on each structure node
//! (empty if there is no value yet), then the record is saved.
//!
//! ## Quick Start
//!
//! ```
//! use metscreation::{
//!     populate_defaults, DocumentRecord, PopulateContext, Ruleset, StructureNode,
//! };
//!
//! let rules = Ruleset::from_json_str(r#"{
//!     "metadata_types": [{ "name": "TitleDocMain" }],
//!     "struct_types": [
//!         { "name": "Monograph", "metadata": [{ "type": "TitleDocMain", "default_display": true }] }
//!     ]
//! }"#)?;
//!
//! let mut record = DocumentRecord::new(StructureNode::new("Monograph"));
//! populate_defaults(&mut record.root, "de", &PopulateContext::new(&rules))?;
//!
//! assert!(record.root.has_metadata("TitleDocMain"));
//! # Ok::<(), metscreation::Error>(())
//! ```
//!
//! ## Running as a step
//!
//! Hosts drive [`MetsCreationStep`] through the [`StepPlugin`] lifecycle. A
//! [`Process`] bundles the record storage ([`RecordStore`]) with the display
//! rules ([`DisplayRules`]):
//!
//! ```no_run
//! use metscreation::{
//!     MetsCreationStep, Process, Ruleset, Step, StepConfig, StepPlugin, XmlFileStore,
//! };
//!
//! let process = Process::new(
//!     "goethe_faust_1808",
//!     XmlFileStore::new("meta.xml"),
//!     Ruleset::load("ruleset.json")?,
//! );
//! let mut plugin = MetsCreationStep::new(StepConfig::default());
//! plugin.initialize(Step::new("Create METS", process), "/tasks".into());
//! assert!(plugin.execute());
//! # Ok::<(), metscreation::Error>(())
//! ```

pub mod error;
pub mod populate;
pub mod record;
pub mod rules;
pub mod step;
pub mod store;
pub(crate) mod util;

pub use error::{Error, Result};
pub use populate::{PopulateContext, PopulateStats, populate_defaults};
pub use record::{DocumentRecord, MetadataField, MetadataGroup, PersonField, StructureNode};
pub use rules::{DisplayRules, FieldDefinition, FieldKind, GroupDefinition, Ruleset};
pub use step::{MetsCreationStep, Process, Step, StepConfig, StepError, StepPlugin};
pub use store::{MemoryStore, RecordStore, XmlFileStore};
