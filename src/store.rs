//! High-score persistence.
//!
//! `ScoreStore` is the capability the session talks to. The JSON store owns
//! its file: every call opens it, does its work, and closes it again, so no
//! handle outlives a single operation.

use crate::error::{GameError, Result};
use crate::info_log;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOP_SCORES: usize = 10;
const SCORES_FILE_NAME: &str = "highscores.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub id: u64,
    pub player_name: String,
    pub score: i64,
    pub timestamp: DateTime<Utc>,
}

pub trait ScoreStore {
    /// Appends a record unless one with the same name and score exists.
    /// Returns whether a record was written.
    fn insert(&mut self, player_name: &str, score: i64) -> Result<bool>;

    /// Highest scores first, at most `limit` records.
    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreRecord>>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn insert(&mut self, player_name: &str, score: i64) -> Result<bool> {
        (**self).insert(player_name, score)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreRecord>> {
        (**self).top_scores(limit)
    }
}

fn append_unique(records: &mut Vec<HighScoreRecord>, player_name: &str, score: i64) -> bool {
    if records
        .iter()
        .any(|r| r.player_name == player_name && r.score == score)
    {
        return false;
    }
    let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    records.push(HighScoreRecord {
        id,
        player_name: player_name.to_string(),
        score,
        timestamp: Utc::now(),
    });
    true
}

/// Descending by score; equal scores keep insertion order.
fn rank(records: &[HighScoreRecord], limit: usize) -> Vec<HighScoreRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
    ranked.truncate(limit);
    ranked
}

/// Store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: Vec<HighScoreRecord>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn insert(&mut self, player_name: &str, score: i64) -> Result<bool> {
        Ok(append_unique(&mut self.records, player_name, score))
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreRecord>> {
        Ok(rank(&self.records, limit))
    }
}

/// Default high-score file under the platform data directory.
#[must_use]
pub fn default_scores_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(crate::APP_DIR_NAME).join(SCORES_FILE_NAME))
}

/// Store backed by a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    /// Prepares the store at `path`, creating parent directories and an
    /// empty table if the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        if let Some(parent) = store.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| store.io_error(e))?;
        }
        if !store.path.exists() {
            store.write_records(&[])?;
            info_log!("Created high-score store at '{}'", store.path.display());
        }
        Ok(store)
    }

    fn io_error(&self, source: io::Error) -> GameError {
        GameError::Persistence {
            path: self.path.clone(),
            source,
        }
    }

    fn read_records(&self) -> Result<Vec<HighScoreRecord>> {
        let data = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).map_err(|source| GameError::StoreFormat {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes to a sibling temp file then renames it over the table, so a
    /// crash mid-write leaves the previous table intact.
    fn write_records(&self, records: &[HighScoreRecord]) -> Result<()> {
        let data = serde_json::to_string_pretty(records).map_err(|source| {
            GameError::StoreFormat {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }
}

impl ScoreStore for JsonScoreStore {
    fn insert(&mut self, player_name: &str, score: i64) -> Result<bool> {
        let mut records = self.read_records()?;
        if !append_unique(&mut records, player_name, score) {
            info_log!("Score already exists for player: {player_name} with score: {score}");
            return Ok(false);
        }
        self.write_records(&records)?;
        info_log!("Saved score {score} for player: {player_name}");
        Ok(true)
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<HighScoreRecord>> {
        Ok(rank(&self.read_records()?, limit))
    }
}
