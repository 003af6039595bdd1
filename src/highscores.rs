//! High score records and the scoreboard contract
//!
//! The core only ranks a finished run and appends a record. Records are
//! immutable once written.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A single persisted run result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Final score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Append-only record store consulted at game over
pub trait Scoreboard {
    /// 1 + number of records with a strictly greater score
    fn rank(&self, score: u64) -> Result<usize, StorageError>;

    /// Append a new record
    fn insert(&mut self, record: ScoreRecord) -> Result<(), StorageError>;

    /// Highest-scoring record, if any
    fn best(&self) -> Result<Option<ScoreRecord>, StorageError>;
}

/// Rank a score against a set of records (ties share a rank)
pub fn rank_in(records: &[ScoreRecord], score: u64) -> usize {
    records.iter().filter(|r| r.score > score).count() + 1
}

/// Best record; the earliest wins a tie
pub fn best_in(records: &[ScoreRecord]) -> Option<ScoreRecord> {
    records
        .iter()
        .copied()
        .reduce(|best, r| if r.score > best.score { r } else { best })
}

/// In-memory scoreboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub records: Vec<ScoreRecord>,
}

impl HighScores {
    /// Create an empty scoreboard
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Check if the scoreboard is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Scoreboard for HighScores {
    fn rank(&self, score: u64) -> Result<usize, StorageError> {
        Ok(rank_in(&self.records, score))
    }

    fn insert(&mut self, record: ScoreRecord) -> Result<(), StorageError> {
        self.records.push(record);
        Ok(())
    }

    fn best(&self) -> Result<Option<ScoreRecord>, StorageError> {
        Ok(best_in(&self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(scores: &[u64]) -> HighScores {
        let mut hs = HighScores::new();
        for (i, &score) in scores.iter().enumerate() {
            hs.insert(ScoreRecord {
                score,
                timestamp: i as u64,
            })
            .unwrap();
        }
        hs
    }

    #[test]
    fn test_rank_empty() {
        let hs = HighScores::new();
        assert_eq!(hs.rank(0).unwrap(), 1);
        assert_eq!(hs.rank(500).unwrap(), 1);
    }

    #[test]
    fn test_rank_ties_not_demoted() {
        let mut hs = board(&[100, 90, 80]);
        assert_eq!(hs.rank(95).unwrap(), 2);
        assert_eq!(hs.rank(80).unwrap(), 3);
        assert_eq!(hs.rank(79).unwrap(), 4);

        hs.insert(ScoreRecord {
            score: 80,
            timestamp: 9,
        })
        .unwrap();
        assert_eq!(hs.rank(80).unwrap(), 3);
    }

    #[test]
    fn test_best() {
        assert_eq!(HighScores::new().best().unwrap(), None);
        let hs = board(&[40, 120, 120, 7]);
        let best = hs.best().unwrap().unwrap();
        assert_eq!(best.score, 120);
        assert_eq!(best.timestamp, 1);
    }
}
