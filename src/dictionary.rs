//! Acronym dictionary loading and random challenge selection.
//!
//! Source format is one `ACRONYM,Full Name` entry per line. The first comma
//! splits the line; there is no escaping, so full names may contain commas.

use crate::error::{GameError, Result};
use crate::info_log;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_DICTIONARY: &str = include_str!("resources/acronyms.txt");

/// One acronym and the full name it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcronymEntry {
    pub acronym: String,
    pub full_name: String,
}

/// Acronym (upper-case) to full name mapping.
///
/// Ordered so that a seeded random source always draws the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcronymDictionary {
    entries: BTreeMap<String, String>,
}

impl AcronymDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn load_from_str(data: &str) -> Self {
        let mut dictionary = Self::new();
        for line in data.lines() {
            dictionary.insert_line(line);
        }
        dictionary
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let to_error = |source| GameError::DictionaryLoad {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(to_error)?;
        let reader = BufReader::new(file);
        let mut dictionary = Self::new();
        for line in reader.lines() {
            dictionary.insert_line(&line.map_err(to_error)?);
        }
        info_log!(
            "Loaded {} acronyms from '{}'",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Parses a single line. Lines without a comma, or with nothing usable on
    /// either side of it, are skipped. Later duplicates overwrite earlier ones.
    fn insert_line(&mut self, line: &str) {
        let Some((acronym, full_name)) = line.split_once(',') else {
            return;
        };
        let acronym = acronym.trim().to_uppercase();
        let full_name = full_name.trim();
        if acronym.is_empty() || full_name.is_empty() {
            return;
        }
        self.entries.insert(acronym, full_name.to_string());
    }

    #[must_use]
    pub fn contains(&self, acronym: &str) -> bool {
        self.entries.contains_key(acronym)
    }

    #[must_use]
    pub fn full_name(&self, acronym: &str) -> Option<&str> {
        self.entries.get(acronym).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Uniformly selects one entry.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Result<AcronymEntry> {
        if self.entries.is_empty() {
            return Err(GameError::EmptyDictionary);
        }
        let index = rng.gen_range(0..self.entries.len());
        let (acronym, full_name) = self
            .entries
            .iter()
            .nth(index)
            .ok_or(GameError::EmptyDictionary)?;
        Ok(AcronymEntry {
            acronym: acronym.clone(),
            full_name: full_name.clone(),
        })
    }
}
