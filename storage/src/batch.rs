//! Write batches
//!
//! Operations that touch more than one record stage their writes here and
//! hand the whole batch to [`crate::ObjectStore::commit`].

use serde::Serialize;

use crate::error::Result;
use crate::space::ObjectSpace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put {
        space: ObjectSpace,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Remove {
        space: ObjectSpace,
        key: Vec<u8>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, space: &ObjectSpace, key: &[u8], value: Vec<u8>) {
        self.ops.push(WriteOp::Put {
            space: space.clone(),
            key: key.to_vec(),
            value,
        });
    }

    /// Stage a bincode-encoded record
    pub fn put_object<T: Serialize>(&mut self, space: &ObjectSpace, key: &[u8], value: &T) -> Result<()> {
        let encoded = bincode::serialize(value)?;
        self.put(space, key, encoded);
        Ok(())
    }

    pub fn remove(&mut self, space: &ObjectSpace, key: &[u8]) {
        self.ops.push(WriteOp::Remove {
            space: space.clone(),
            key: key.to_vec(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_keeps_order() {
        let space = ObjectSpace::system("resources", 0);
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch.put_object(&space, b"a", &7u64).unwrap();
        batch.remove(&space, b"a");

        assert_eq!(batch.len(), 2);
        assert!(matches!(batch.ops()[0], WriteOp::Put { .. }));
        assert!(matches!(batch.ops()[1], WriteOp::Remove { .. }));
    }
}
