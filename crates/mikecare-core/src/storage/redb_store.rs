//! # redb-backed Key-Value Store
//!
//! A disk-backed store using the redb embedded database, providing:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! Each `set`/`remove` commits its own write transaction, so every change is
//! durable as soon as the call returns.

use super::{KeyValueStore, StoreKey};
use crate::CareError;
use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for entries: key string -> value string
const ENTRIES: TableDefinition<&str, &str> = TableDefinition::new("entries");

fn io_err(e: impl std::fmt::Display) -> CareError {
    CareError::IoError(e.to_string())
}

/// A disk-backed key-value store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CareError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize the table so read transactions never see it missing
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(ENTRIES).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, CareError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ENTRIES).map_err(io_err)?;
        Ok(table.len().map_err(io_err)? as usize)
    }

    pub fn is_empty(&self) -> Result<bool, CareError> {
        Ok(self.len()? == 0)
    }

    /// Remove every entry in one transaction.
    pub fn clear(&mut self) -> Result<(), CareError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(io_err)?;
            for key in StoreKey::ALL {
                table.remove(key.as_str()).map_err(io_err)?;
            }
        }
        write_txn.commit().map_err(io_err)
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, CareError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(ENTRIES).map_err(io_err)?;
        let value = table
            .get(key.as_str())
            .map_err(io_err)?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), CareError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(io_err)?;
            table.insert(key.as_str(), value).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), CareError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(ENTRIES).map_err(io_err)?;
            table.remove(key.as_str()).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)
    }
}

// =============================================================================
// TESTS
// =============================================================================
