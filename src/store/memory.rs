use std::cell::RefCell;
use std::rc::Rc;

use super::RecordStore;
use crate::error::{Error, Result};
use crate::record::DocumentRecord;

/// A record held in memory.
///
/// Clones share the same storage, so a caller can keep a handle to inspect
/// what a step wrote after handing the store over.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    record: Option<DocumentRecord>,
    read_unavailable: bool,
    write_unavailable: bool,
    reads: usize,
    writes: usize,
}

impl MemoryStore {
    pub fn new(record: DocumentRecord) -> Self {
        let store = Self::default();
        store.state.borrow_mut().record = Some(record);
        store
    }

    /// Make every read fail as if the storage were offline.
    pub fn unavailable_on_read(self) -> Self {
        self.state.borrow_mut().read_unavailable = true;
        self
    }

    /// Make every write fail as if the storage were offline.
    pub fn unavailable_on_write(self) -> Self {
        self.state.borrow_mut().write_unavailable = true;
        self
    }

    /// The currently stored record.
    pub fn stored(&self) -> Option<DocumentRecord> {
        self.state.borrow().record.clone()
    }

    pub fn read_count(&self) -> usize {
        self.state.borrow().reads
    }

    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }
}

impl RecordStore for MemoryStore {
    fn read_record(&self) -> Result<DocumentRecord> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        if state.read_unavailable {
            return Err(Error::StorageUnavailable("memory store is offline".into()));
        }
        state
            .record
            .clone()
            .ok_or_else(|| Error::StorageUnavailable("no record stored".into()))
    }

    fn write_record(&self, record: &DocumentRecord) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.write_unavailable {
            return Err(Error::StorageUnavailable("memory store is offline".into()));
        }
        state.record = Some(record.clone());
        state.writes += 1;
        Ok(())
    }
}
