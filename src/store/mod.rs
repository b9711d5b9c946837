//! Loading and saving records.
//!
//! The workflow host owns record storage; [`RecordStore`] is the seam it
//! plugs into. Two stores ship with the crate:
//! - [`XmlFileStore`]: a record file on disk
//! - [`MemoryStore`]: an in-memory record, for embedding and tests

mod memory;
mod xml;

pub use memory::MemoryStore;
pub use xml::{XmlFileStore, parse_record_xml, write_record_xml};

use crate::error::Result;
use crate::record::DocumentRecord;

/// Storage of a single process's metadata record.
pub trait RecordStore {
    /// Load the record.
    ///
    /// Fails with [`Error::StorageUnavailable`](crate::Error::StorageUnavailable)
    /// when there is nothing to read, [`Error::Read`](crate::Error::Read) when
    /// the stored data is not a valid record.
    fn read_record(&self) -> Result<DocumentRecord>;

    /// Replace the stored record.
    fn write_record(&self, record: &DocumentRecord) -> Result<()>;
}
