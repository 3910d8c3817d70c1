//! Session state machine: title screen, play, game over, name entry, and the
//! high-score table with the replay prompt.
//!
//! # State Machine
//! - `TitleScreen` → `Playing` on a mode key ('1'/'2'/'3'); the dictionary is
//!   loaded fresh every time a mode is picked
//! - `Playing` → `GameOver` when the round ends; → `Exited` on a quit answer
//! - `GameOver` → `NameEntry` on the next event
//! - `NameEntry` → `ReplayPrompt` on Enter, after the score is stored
//! - `ReplayPrompt` → `Playing` on 'Y' (same mode and dictionary); → `Exited` on 'N'
//!
//! Errors never leave this module: they are logged, kept as a user-visible
//! message, and the session stays in a safe state.

use crate::dictionary::{AcronymDictionary, EMBEDDED_DICTIONARY};
use crate::error::{GameError, Result};
use crate::matcher::Outcome;
use crate::round::{GameMode, RoundConfig, RoundOutcome, RoundState};
use crate::store::{DEFAULT_TOP_SCORES, HighScoreRecord, ScoreStore};
use crate::{debug_log, info_log};
use rand::Rng;
use std::path::PathBuf;
use std::time::Instant;

pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

const BACKSPACE_CODE: u32 = 8;
const ENTER_CODE: u32 = 13;
const PRINTABLE_FIRST: u32 = 0x20;
const PRINTABLE_LAST: u32 = 0x7E;

/// A keyboard event after the front-end has translated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable ASCII, 0x20 to 0x7E.
    Char(char),
    Backspace,
    Enter,
    /// Window closed or the user aborted; exits from any state.
    Close,
}

impl KeyInput {
    /// Maps a text-entry code to a key. Anything outside backspace, enter,
    /// and printable ASCII is ignored.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            BACKSPACE_CODE => Some(Self::Backspace),
            ENTER_CODE => Some(Self::Enter),
            PRINTABLE_FIRST..=PRINTABLE_LAST => char::from_u32(code).map(Self::Char),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    TitleScreen,
    Playing,
    GameOver {
        final_score: i64,
        outcome: RoundOutcome,
    },
    NameEntry {
        final_score: i64,
    },
    /// High-score table and the play-again question, shown together.
    ReplayPrompt {
        final_score: i64,
    },
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Exit,
}

/// Where a mode selection loads its dictionary from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    File(PathBuf),
    Embedded,
}

impl DictionarySource {
    /// Fails with `DictionaryLoad` when the file cannot be opened or read.
    pub fn load(&self) -> Result<AcronymDictionary> {
        match self {
            Self::File(path) => AcronymDictionary::load_from_file(path),
            Self::Embedded => Ok(AcronymDictionary::load_from_str(EMBEDDED_DICTIONARY)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub dictionary: DictionarySource,
    pub round: RoundConfig,
    pub top_scores: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dictionary: DictionarySource::Embedded,
            round: RoundConfig::default(),
            top_scores: DEFAULT_TOP_SCORES,
        }
    }
}

pub struct SessionController<S: ScoreStore, R: Rng> {
    config: SessionConfig,
    store: S,
    rng: R,
    state: SessionState,
    dictionary: AcronymDictionary,
    mode: Option<GameMode>,
    round: Option<RoundState>,
    answer: String,
    player_name: String,
    score_saved: bool,
    top_scores: Vec<HighScoreRecord>,
    error_message: Option<String>,
}

impl<S: ScoreStore, R: Rng> SessionController<S, R> {
    pub fn new(config: SessionConfig, store: S, rng: R) -> Self {
        Self {
            config,
            store,
            rng,
            state: SessionState::TitleScreen,
            dictionary: AcronymDictionary::new(),
            mode: None,
            round: None,
            answer: String::new(),
            player_name: String::new(),
            score_saved: false,
            top_scores: Vec::new(),
            error_message: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state != SessionState::Exited
    }

    #[must_use]
    pub fn mode(&self) -> Option<GameMode> {
        self.mode
    }

    #[must_use]
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    #[must_use]
    pub fn dictionary(&self) -> &AcronymDictionary {
        &self.dictionary
    }

    /// Text typed so far in the answer field.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Last table read from the store; may be stale after a store failure.
    #[must_use]
    pub fn top_scores(&self) -> &[HighScoreRecord] {
        &self.top_scores
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn handle_key(&mut self, key: KeyInput) -> SessionStatus {
        debug_log!("handle_key() - {:?} in {:?}", key, self.state);
        if key == KeyInput::Close {
            self.transition(SessionState::Exited);
            return self.status();
        }

        if let SessionState::GameOver { final_score, .. } = self.state {
            self.enter_name_entry(final_score);
        }

        match self.state {
            SessionState::TitleScreen => self.handle_title_key(key),
            SessionState::Playing => self.handle_playing_key(key),
            SessionState::NameEntry { final_score } => self.handle_name_key(key, final_score),
            SessionState::ReplayPrompt { .. } => self.handle_replay_key(key),
            SessionState::GameOver { .. } | SessionState::Exited => {}
        }
        self.status()
    }

    /// Advances the round clocks by polling against `now`, and moves a
    /// finished round on to name entry.
    pub fn tick(&mut self, now: Instant) -> SessionStatus {
        match self.state {
            SessionState::Playing => {
                if let Some(round) = self.round.as_mut() {
                    round.advance(now);
                }
                self.check_round_over();
            }
            SessionState::GameOver { final_score, .. } => self.enter_name_entry(final_score),
            _ => {}
        }
        self.status()
    }

    fn status(&self) -> SessionStatus {
        if self.is_running() {
            SessionStatus::Running
        } else {
            SessionStatus::Exit
        }
    }

    fn transition(&mut self, next: SessionState) {
        info_log!("Session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn report(&mut self, error: &GameError) {
        log::error!("{error}");
        self.error_message = Some(error.to_string());
    }

    fn handle_title_key(&mut self, key: KeyInput) {
        let KeyInput::Char(c) = key else {
            return;
        };
        if let Some(mode) = GameMode::from_key(c) {
            match self.config.dictionary.load() {
                Ok(dictionary) => {
                    self.dictionary = dictionary;
                    self.start_round(mode);
                }
                Err(e) => {
                    self.report(&e);
                    self.dictionary = AcronymDictionary::new();
                    self.round = None;
                }
            }
        } else if c.eq_ignore_ascii_case(&'q') {
            self.transition(SessionState::Exited);
        }
    }

    /// Builds a fresh round over the current dictionary. An empty dictionary
    /// leaves the session on the title screen.
    fn start_round(&mut self, mode: GameMode) {
        match RoundState::new(mode, self.config.round, &self.dictionary, &mut self.rng) {
            Ok(round) => {
                self.round = Some(round);
                self.mode = Some(mode);
                self.answer.clear();
                self.player_name.clear();
                self.score_saved = false;
                self.error_message = None;
                self.transition(SessionState::Playing);
            }
            Err(e) => {
                self.report(&e);
                self.round = None;
                self.transition(SessionState::TitleScreen);
            }
        }
    }

    fn handle_playing_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char(c) => self.answer.push(c),
            KeyInput::Backspace => {
                self.answer.pop();
            }
            KeyInput::Enter => self.commit_answer(),
            KeyInput::Close => {}
        }
    }

    fn commit_answer(&mut self) {
        let answer = std::mem::take(&mut self.answer);
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.commit(&answer, &self.dictionary, &mut self.rng) {
            Ok(Some(Outcome::QuitRequested)) => {
                info_log!("Quitting the game.");
                self.transition(SessionState::Exited);
                return;
            }
            Ok(_) => {}
            Err(e) => self.report(&e),
        }
        self.check_round_over();
    }

    fn check_round_over(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        if self.state == SessionState::Playing && !round.is_playing() {
            let next = SessionState::GameOver {
                final_score: round.score(),
                outcome: round.outcome(),
            };
            self.answer.clear();
            self.transition(next);
        }
    }

    fn enter_name_entry(&mut self, final_score: i64) {
        self.player_name.clear();
        self.transition(SessionState::NameEntry { final_score });
    }

    fn handle_name_key(&mut self, key: KeyInput, final_score: i64) {
        match key {
            KeyInput::Char(c) => self.player_name.push(c),
            KeyInput::Backspace => {
                self.player_name.pop();
            }
            KeyInput::Enter => self.save_score(final_score),
            KeyInput::Close => {}
        }
    }

    /// Stores the round's score once, then reads the table back so the
    /// display always follows the write.
    fn save_score(&mut self, final_score: i64) {
        if self.player_name.is_empty() {
            self.player_name = DEFAULT_PLAYER_NAME.to_string();
        }

        if !self.score_saved {
            self.score_saved = true;
            if let Err(e) = self.store.insert(&self.player_name, final_score) {
                self.report(&e);
            }
        }

        match self.store.top_scores(self.config.top_scores) {
            Ok(top) => self.top_scores = top,
            Err(e) => self.report(&e),
        }
        self.transition(SessionState::ReplayPrompt { final_score });
    }

    fn handle_replay_key(&mut self, key: KeyInput) {
        match key {
            KeyInput::Char('y' | 'Y') => match self.mode {
                Some(mode) => self.start_round(mode),
                None => self.transition(SessionState::TitleScreen),
            },
            KeyInput::Char('n' | 'N') => self.transition(SessionState::Exited),
            _ => {}
        }
    }
}
