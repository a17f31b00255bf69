//! Key/value persistence substrate.
//!
//! The habit store only ever reads and writes whole string values under a
//! handful of fixed keys, so any backend that can do that will serve.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;

/// A string-keyed store of string values.
pub trait KvStore {
    /// Get a value, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Insert or replace several values at once.
    ///
    /// Either every pair is stored or, on error, none is.
    fn set_many(&self, pairs: &[(&str, String)]) -> Result<()>;
}

/// In-process store backed by a `HashMap`. Contents die with the value.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        for (key, value) in pairs {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kv_set_get_remove() {
        let kv = MemoryKv::new();
        assert!(kv.get("k").unwrap().is_none());
        kv.set("k", "v1").unwrap();
        kv.set("k", "v2").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
        kv.remove("k").unwrap();
        kv.remove("k").unwrap();
        assert!(kv.get("k").unwrap().is_none());
    }

    #[test]
    fn memory_kv_set_many() {
        let kv = MemoryKv::new();
        kv.set("a", "old").unwrap();
        kv.set_many(&[("a", "1".to_string()), ("b", "2".to_string())])
            .unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(kv.get("b").unwrap().as_deref(), Some("2"));
    }
}
