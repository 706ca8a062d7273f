//! # Durable Key-Value Store
//!
//! String keys mapped to string values. Structured values are stored as JSON
//! text so the layout matches what a browser client keeps in local storage.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: BTreeMap-backed, volatile
//! - [`RedbStore`]: redb-backed, ACID and persistent
//!
//! The store is the only hand-off channel between the submission flow and
//! the Solutions view: write once on submit, read once on mount.

mod redb_store;

pub use redb_store::RedbStore;

use crate::CareError;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// KEYS
// =============================================================================

/// Every key the application reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    /// Signed-in user (JSON).
    User,
    /// Onboarding completion flag (`"completed"`).
    Onboarding,
    /// Preferred language (raw string).
    Language,
    /// Onboarding questionnaire answers (JSON object).
    Responses,
    /// Latest submission record (JSON).
    CurrentInput,
    /// Plan resolved for the latest submission (JSON).
    CurrentSolution,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::User,
        StoreKey::Onboarding,
        StoreKey::Language,
        StoreKey::Responses,
        StoreKey::CurrentInput,
        StoreKey::CurrentSolution,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKey::User => "mikecare_user",
            StoreKey::Onboarding => "mikecare_onboarding",
            StoreKey::Language => "mikecare_language",
            StoreKey::Responses => "mikecare_responses",
            StoreKey::CurrentInput => "currentInput",
            StoreKey::CurrentSolution => "currentSolution",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Minimal durable key-value interface.
///
/// All operations return `Result` so in-memory and persistent backends can
/// be used interchangeably.
pub trait KeyValueStore {
    /// Raw value for a key, if present.
    fn get(&self, key: StoreKey) -> Result<Option<String>, CareError>;

    /// Insert or replace a value.
    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), CareError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&mut self, key: StoreKey) -> Result<(), CareError>;

    /// Deserialize a JSON value stored under `key`.
    fn get_json<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, CareError>
    where
        Self: Sized,
    {
        self.get(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| {
                    CareError::DeserializationError(format!("{}: {}", key, e))
                })
            })
            .transpose()
    }

    /// Serialize `value` to JSON and store it under `key`.
    fn set_json<T: Serialize>(&mut self, key: StoreKey, value: &T) -> Result<(), CareError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)
            .map_err(|e| CareError::SerializationError(format!("{}: {}", key, e)))?;
        self.set(key, &raw)
    }
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// Volatile store backed by a `BTreeMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StoreKey, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>, CareError> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), CareError> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), CareError> {
        self.entries.remove(&key);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
