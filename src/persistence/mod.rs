//! File-backed scoreboard
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes (tmp → save)
//! - Append-only: records are never rewritten or removed

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::highscores::{ScoreRecord, Scoreboard, best_in, rank_in};

/// Current on-disk format version
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    records: Vec<ScoreRecord>,
}

/// Scoreboard persisted as a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<ScoreRecord>,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let records = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let envelope: Envelope = serde_json::from_str(&json)?;
            if envelope.version != FORMAT_VERSION {
                return Err(StorageError::Unavailable(format!(
                    "unsupported scoreboard version {}",
                    envelope.version
                )));
            }
            log::info!("Loaded {} score records", envelope.records.len());
            envelope.records
        } else {
            log::info!("No scoreboard at {}, starting fresh", path.display());
            Vec::new()
        };
        Ok(Self { path, records })
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn write(&self, records: &[ScoreRecord]) -> Result<(), StorageError> {
        let envelope = Envelope {
            version: FORMAT_VERSION,
            records: records.to_vec(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Scoreboard for JsonFileStore {
    fn rank(&self, score: u64) -> Result<usize, StorageError> {
        Ok(rank_in(&self.records, score))
    }

    fn insert(&mut self, record: ScoreRecord) -> Result<(), StorageError> {
        let mut next = self.records.clone();
        next.push(record);
        // Only commit in memory once the file write succeeded
        self.write(&next)?;
        self.records = next;
        log::info!("Score {} saved ({} records)", record.score, self.records.len());
        Ok(())
    }

    fn best(&self) -> Result<Option<ScoreRecord>, StorageError> {
        Ok(best_in(&self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "scroll-runner-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let path = scratch("missing");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.rank(10).unwrap(), 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = scratch("reopen");
        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .insert(ScoreRecord {
                score: 42,
                timestamp: 1_000,
            })
            .unwrap();
        store
            .insert(ScoreRecord {
                score: 17,
                timestamp: 2_000,
            })
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.best().unwrap().unwrap().score, 42);
        assert_eq!(reopened.rank(20).unwrap(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let path = scratch("corrupt");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StorageError::Parse(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let path = scratch("version");
        fs::write(&path, r#"{ "version": 99, "records": [] }"#).unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StorageError::Unavailable(_))
        ));
        let _ = fs::remove_file(&path);
    }
}
