//! In-memory object store

use std::collections::BTreeMap;

use crate::batch::{WriteBatch, WriteOp};
use crate::error::Result;
use crate::space::ObjectSpace;
use crate::ObjectStore;

/// Ordered in-memory store, keyed by space-scoped keys
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all spaces
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of stored records in one space
    pub fn count(&self, space: &ObjectSpace) -> usize {
        let prefix = space.prefix();
        self.objects
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .count()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, space: &ObjectSpace, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.get(&space.scoped_key(key)).cloned())
    }

    fn put(&mut self, space: &ObjectSpace, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.objects.insert(space.scoped_key(key), value);
        Ok(())
    }

    fn remove(&mut self, space: &ObjectSpace, key: &[u8]) -> Result<()> {
        self.objects.remove(&space.scoped_key(key));
        Ok(())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<()> {
        // Inserts cannot fail, so applying in order is already all-or-nothing
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { space, key, value } => {
                    self.objects.insert(space.scoped_key(&key), value);
                }
                WriteOp::Remove { space, key } => {
                    self.objects.remove(&space.scoped_key(&key));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        value: u64,
        name: String,
    }

    #[test]
    fn test_put_and_get_object() {
        let mut store = MemoryStore::new();
        let space = ObjectSpace::system("resources", 1);
        let data = TestData {
            value: 12345,
            name: "test".to_string(),
        };

        store.put_object(&space, b"key", &data).unwrap();
        let loaded: Option<TestData> = store.get_object(&space, b"key").unwrap();

        assert_eq!(loaded, Some(data));
    }

    #[test]
    fn test_spaces_are_isolated() {
        let mut store = MemoryStore::new();
        let markets = ObjectSpace::system("resources", 0);
        let credits = ObjectSpace::system("resources", 2);

        store.put_object(&markets, b"alice", &1u64).unwrap();

        assert_eq!(store.get_object::<u64>(&credits, b"alice").unwrap(), None);
        assert_eq!(store.count(&markets), 1);
        assert_eq!(store.count(&credits), 0);
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        let space = ObjectSpace::new("token", 1);

        store.put(&space, b"bob", vec![1, 2, 3]).unwrap();
        store.remove(&space, b"bob").unwrap();

        assert!(store.get(&space, b"bob").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_commit_batch() {
        let mut store = MemoryStore::new();
        let space = ObjectSpace::system("resources", 0);
        store.put_object(&space, b"stale", &0u64).unwrap();

        let mut batch = WriteBatch::new();
        batch.put_object(&space, b"a", &1u64).unwrap();
        batch.put_object(&space, b"b", &2u64).unwrap();
        batch.remove(&space, b"stale");
        store.commit(batch).unwrap();

        assert_eq!(store.get_object::<u64>(&space, b"a").unwrap(), Some(1));
        assert_eq!(store.get_object::<u64>(&space, b"b").unwrap(), Some(2));
        assert_eq!(store.get_object::<u64>(&space, b"stale").unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_corrupt_record_is_serialization_error() {
        let mut store = MemoryStore::new();
        let space = ObjectSpace::system("resources", 0);
        store.put(&space, b"bad", vec![1]).unwrap();

        let result = store.get_object::<TestData>(&space, b"bad");
        assert!(matches!(result, Err(crate::StorageError::SerializationError(_))));
    }
}
