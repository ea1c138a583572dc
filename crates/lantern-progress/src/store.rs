//! Key-value persistence seam for the save record.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Where the save record lives. One string blob per key.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, data: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: SaveStore + ?Sized> SaveStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), StoreError> {
        (**self).write(key, data)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same contents, so a test can keep a
/// handle and inspect what the game wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, data: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), data.to_owned());
    }

    /// Make every subsequent write fail, as a full or revoked store would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), StoreError> {
        if self.failing.get() {
            return Err(StoreError::Unavailable(format!("write to {key} refused")));
        }
        self.insert(key, data);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
