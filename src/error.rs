//! Error types shared by the game core and the terminal front-end.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The dictionary file could not be opened or read.
    #[error("failed to load acronym dictionary from '{}': {source}", path.display())]
    DictionaryLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A random challenge was requested from a dictionary with no entries.
    #[error("acronym dictionary is empty")]
    EmptyDictionary,

    #[error("high-score store at '{}' is unavailable: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("high-score store at '{}' is corrupt: {source}", path.display())]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
