// Library interface for acronym-invaders
// The binary is a thin terminal front-end over these modules.

pub mod cli;
pub mod dictionary;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod round;
pub mod session;
pub mod store;
pub mod tui;

/// Directory name under the platform data dir for scores and logs.
pub const APP_DIR_NAME: &str = "acronym-invaders";

// Re-export commonly used items for easier testing
pub use dictionary::{AcronymDictionary, AcronymEntry, EMBEDDED_DICTIONARY};
pub use error::GameError;
pub use matcher::{MatchPolicy, Outcome, evaluate};
pub use round::{Challenge, DisplayMode, GameMode, RoundConfig, RoundOutcome, RoundState};
pub use session::{
    DictionarySource, KeyInput, SessionConfig, SessionController, SessionState, SessionStatus,
};
pub use store::{HighScoreRecord, JsonScoreStore, MemoryScoreStore, ScoreStore};
