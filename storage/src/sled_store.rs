//! Sled-based persistence for resource state
use std::path::Path;

use crate::batch::{WriteBatch, WriteOp};
use crate::error::{Result, StorageError};
use crate::space::ObjectSpace;
use crate::ObjectStore;

/// On-disk store. Every space shares the default tree so that a batch
/// spanning several spaces still commits as one `sled::Batch`.
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    path: String,
}

impl SledStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let db = sled::open(&path)
            .map_err(|e| StorageError::IoError(format!("Failed to open database: {}", e)))?;

        Ok(SledStore { db, path: path_str })
    }

    /// Open a throwaway database that is removed on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| StorageError::IoError(format!("Failed to open database: {}", e)))?;

        Ok(SledStore {
            db,
            path: String::new(),
        })
    }

    /// Get the database path
    pub fn path(&self) -> &str {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| StorageError::IoError(format!("Failed to flush to disk: {}", e)))?;
        Ok(())
    }
}

impl ObjectStore for SledStore {
    fn get(&self, space: &ObjectSpace, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.db.get(space.scoped_key(key)) {
            Ok(Some(data)) => Ok(Some(data.to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to load object from {}: {}",
                space, e
            ))),
        }
    }

    fn put(&mut self, space: &ObjectSpace, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.db
            .insert(space.scoped_key(key), value)
            .map_err(|e| StorageError::IoError(format!("Failed to save object to {}: {}", space, e)))?;
        self.flush()
    }

    fn remove(&mut self, space: &ObjectSpace, key: &[u8]) -> Result<()> {
        self.db.remove(space.scoped_key(key)).map_err(|e| {
            StorageError::IoError(format!("Failed to remove object from {}: {}", space, e))
        })?;
        self.flush()
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        let mut sled_batch = sled::Batch::default();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { space, key, value } => sled_batch.insert(space.scoped_key(&key), value),
                WriteOp::Remove { space, key } => sled_batch.remove(space.scoped_key(&key)),
            }
        }

        self.db
            .apply_batch(sled_batch)
            .map_err(|e| StorageError::IoError(format!("Failed to commit batch: {}", e)))?;
        log::debug!("committed {} writes to {}", count, self.path);

        // Flush to ensure it's on disk
        self.flush()
    }
}
