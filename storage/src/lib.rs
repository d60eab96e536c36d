//! Resource Credits Storage Layer
//!
//! The abstract key-value object store the resource economy persists through:
//! - `get` / `put` / `remove` grouped by [`ObjectSpace`]
//! - Atomic multi-record commits through [`WriteBatch`]
//! - Records encoded with bincode
//!
//! Two backends are provided: [`MemoryStore`] for tests and simulation and
//! [`SledStore`] for on-disk state.

pub mod batch;
pub mod error;
pub mod memory;
pub mod sled_store;
pub mod space;

pub use batch::{WriteBatch, WriteOp};
pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use space::ObjectSpace;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key-value object store contract.
///
/// Implementations must give read-your-writes consistency and apply a
/// committed batch entirely or not at all.
pub trait ObjectStore {
    fn get(&self, space: &ObjectSpace, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn put(&mut self, space: &ObjectSpace, key: &[u8], value: Vec<u8>) -> Result<()>;

    fn remove(&mut self, space: &ObjectSpace, key: &[u8]) -> Result<()>;

    /// Apply every operation in `batch` atomically
    fn commit(&mut self, batch: WriteBatch) -> Result<()>;

    /// Load and decode a record
    fn get_object<T: DeserializeOwned>(&self, space: &ObjectSpace, key: &[u8]) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(space, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a record
    fn put_object<T: Serialize>(&mut self, space: &ObjectSpace, key: &[u8], value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let encoded = bincode::serialize(value)?;
        self.put(space, key, encoded)
    }
}
