//! Remembers when a page last received a vote.
//!
//! Stores hold one timestamp per key and never evict anything; whether a
//! record is still recent is decided by the reader.

use crate::error::StorageError;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key for a page. Pure and stable across sessions.
pub fn derive_key(project: &str, path: &str) -> String {
    format!("feedback-{}/{}", project, path)
}

pub trait VoteMemory: Send + Sync {
    /// Timestamp of the last vote, or `None` when nothing usable is stored.
    fn get(&self, key: &str) -> Option<DateTime<Utc>>;

    fn set(&self, key: &str, at: DateTime<Utc>) -> Result<(), StorageError>;
}

/// Session-only memory, also used when durable storage is disabled.
#[derive(Debug, Default)]
pub struct InMemoryVoteMemory {
    records: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryVoteMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteMemory for InMemoryVoteMemory {
    fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.records.lock() {
            Ok(records) => records.get(key).copied(),
            Err(poisoned) => poisoned.into_inner().get(key).copied(),
        }
    }

    fn set(&self, key: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        match self.records.lock() {
            Ok(mut records) => {
                records.insert(key.to_owned(), at);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key.to_owned(), at);
            }
        }
        Ok(())
    }
}

/// Durable memory backed by a JSON object of `key -> ISO-8601 timestamp`.
#[derive(Debug, Clone)]
pub struct FileVoteMemory {
    path: PathBuf,
}

impl FileVoteMemory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl VoteMemory for FileVoteMemory {
    fn get(&self, key: &str) -> Option<DateTime<Utc>> {
        let records = match self.load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Vote memory unavailable at {}: {}", self.path.display(), e);
                return None;
            }
        };

        let raw = records.get(key)?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unparsable vote timestamp {:?} for {}: {}", raw, key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut records = match self.load() {
            Ok(records) => records,
            Err(StorageError::Corrupt(e)) => {
                warn!("Replacing corrupt vote memory at {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        records.insert(key.to_owned(), at.to_rfc3339_opts(SecondsFormat::AutoSi, true));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&records)?)?;
        debug!("Recorded vote for {} at {}", key, at);
        Ok(())
    }
}
