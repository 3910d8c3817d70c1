use crate::logging::default_log_path;
use crate::session::{DictionarySource, SessionConfig};
use crate::store::default_scores_path;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Dictionary picked up from the working directory when `--dictionary` is absent.
pub const DEFAULT_DICTIONARY_FILE: &str = "acronyms.txt";

/// Acronym Invaders: match acronyms and full names before the ship lands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to an `ACRONYM,Full Name` dictionary file
    #[arg(short = 'd', long = "dictionary")]
    pub dictionary_path: Option<PathBuf>,

    /// Path to the high-score file
    #[arg(short = 's', long = "scores")]
    pub scores_path: Option<PathBuf>,

    /// Seed for the random source, for repeatable sessions
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    #[must_use]
    pub fn dictionary_source(&self) -> DictionarySource {
        match &self.dictionary_path {
            Some(path) => DictionarySource::File(path.clone()),
            None if Path::new(DEFAULT_DICTIONARY_FILE).is_file() => {
                DictionarySource::File(PathBuf::from(DEFAULT_DICTIONARY_FILE))
            }
            None => DictionarySource::Embedded,
        }
    }

    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            dictionary: self.dictionary_source(),
            ..SessionConfig::default()
        }
    }

    #[must_use]
    pub fn scores_path(&self) -> Option<PathBuf> {
        self.scores_path.clone().or_else(default_scores_path)
    }

    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(default_log_path)
    }

    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
