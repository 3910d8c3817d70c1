//! Round state: timer, score, the falling sprite, and the active challenge.
//!
//! # State Machine
//! A round starts `Playing` and ends in `TimeExpired` or `Caught`. Both end
//! states are terminal; a replay builds a fresh `RoundState`.
//!
//! Timer and fall advancement are polled against elapsed time each frame
//! (see [`RoundClock`]), so ticks are only approximately periodic.

use crate::dictionary::{AcronymDictionary, AcronymEntry};
use crate::error::Result;
use crate::matcher::{self, MatchPolicy, Outcome};
use crate::{debug_log, info_log};
use rand::Rng;
use std::time::{Duration, Instant};

pub const SPRITE_VARIANTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Shown a full name, type any valid acronym.
    Acronym,
    /// Shown an acronym, type its full name. The sprite does not fall on its own.
    Term,
    /// Acronym rules with a faster fall.
    Challenge,
}

impl GameMode {
    /// Title-screen key for each mode.
    #[must_use]
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Acronym),
            '2' => Some(Self::Term),
            '3' => Some(Self::Challenge),
            _ => None,
        }
    }

    /// Inverse of [`GameMode::from_key`].
    #[must_use]
    pub fn key(self) -> char {
        match self {
            Self::Acronym => '1',
            Self::Term => '2',
            Self::Challenge => '3',
        }
    }

    #[must_use]
    pub fn policy(self) -> MatchPolicy {
        match self {
            Self::Acronym | Self::Challenge => MatchPolicy::ExactKeyMembership,
            Self::Term => MatchPolicy::ExactFullNameEquality,
        }
    }

    #[must_use]
    pub fn display_mode(self) -> DisplayMode {
        match self {
            Self::Acronym | Self::Challenge => DisplayMode::ShowFullName,
            Self::Term => DisplayMode::ShowAcronym,
        }
    }

    #[must_use]
    pub fn fall_speed(self, config: &RoundConfig) -> f32 {
        match self {
            Self::Acronym => config.acronym_fall_speed,
            Self::Term => config.term_fall_speed,
            Self::Challenge => config.challenge_fall_speed,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Acronym => "Acronym Mode",
            Self::Term => "Term Mode",
            Self::Challenge => "Challenge Mode",
        }
    }

    #[must_use]
    pub fn miss_message(self) -> &'static str {
        match self {
            Self::Term => "Incorrect! Try again.",
            Self::Acronym | Self::Challenge => "Missed!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Show the full name, expect the acronym.
    ShowFullName,
    /// Show the acronym, expect the full name.
    ShowAcronym,
}

/// The entry currently on the falling sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub entry: AcronymEntry,
    pub display: DisplayMode,
    /// Sequence number of the draw within the round, starting at 1.
    pub draw: u32,
}

impl Challenge {
    #[must_use]
    pub fn prompt(&self) -> &str {
        match self.display {
            DisplayMode::ShowFullName => &self.entry.full_name,
            DisplayMode::ShowAcronym => &self.entry.acronym,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Playing,
    TimeExpired,
    Caught,
}

/// Playfield geometry in abstract units; the renderer scales it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    pub sprite_width: f32,
    pub sprite_height: f32,
}

impl Playfield {
    /// Fall position at which the sprite touches the bottom edge.
    #[must_use]
    pub fn bottom_boundary(&self) -> f32 {
        self.height - self.sprite_height
    }

    fn max_horizontal(&self) -> f32 {
        (self.width - self.sprite_width).max(0.0)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            sprite_width: 100.0,
            sprite_height: 100.0,
        }
    }
}

/// Numeric rules of a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    pub initial_time: i32,
    pub hit_time_bonus: i32,
    pub score_step: i64,
    pub miss_drop: f32,
    pub timer_interval: Duration,
    pub fall_interval: Duration,
    pub acronym_fall_speed: f32,
    pub term_fall_speed: f32,
    pub challenge_fall_speed: f32,
    pub playfield: Playfield,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            initial_time: 30,
            hit_time_bonus: 5,
            score_step: 100,
            miss_drop: 45.0,
            timer_interval: Duration::from_secs(1),
            fall_interval: Duration::from_secs(1) / 60,
            acronym_fall_speed: 0.75,
            term_fall_speed: 0.0,
            challenge_fall_speed: 1.75,
            playfield: Playfield::default(),
        }
    }
}

/// Elapsed-time clock that fires once per consumed interval.
///
/// Starts on the first poll and restarts after every firing, so drift from
/// frame jitter accumulates instead of being caught up.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    started: Option<Instant>,
}

impl Ticker {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            started: None,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(started) = self.started else {
            self.started = Some(now);
            return false;
        };
        if now.saturating_duration_since(started) >= self.interval {
            self.started = Some(now);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    pub timer: bool,
    pub fall: bool,
}

/// The two per-round clocks: the one-second countdown and the fall cadence.
#[derive(Debug, Clone)]
pub struct RoundClock {
    timer: Ticker,
    fall: Ticker,
}

impl RoundClock {
    #[must_use]
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            timer: Ticker::new(config.timer_interval),
            fall: Ticker::new(config.fall_interval),
        }
    }

    pub fn poll(&mut self, now: Instant) -> Ticks {
        Ticks {
            timer: self.timer.poll(now),
            fall: self.fall.poll(now),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundState {
    mode: GameMode,
    config: RoundConfig,
    score: i64,
    time_remaining: i32,
    fall_position: f32,
    horizontal_position: f32,
    sprite_variant: usize,
    challenge: Challenge,
    outcome: RoundOutcome,
    last_outcome: Option<Outcome>,
    clock: RoundClock,
}

impl RoundState {
    /// Starts a round with a random first challenge.
    ///
    /// Fails with `EmptyDictionary` when there is nothing to draw.
    pub fn new<R: Rng>(
        mode: GameMode,
        config: RoundConfig,
        dictionary: &AcronymDictionary,
        rng: &mut R,
    ) -> Result<Self> {
        let entry = dictionary.pick_random(rng)?;
        let mut round = Self {
            mode,
            config,
            score: 0,
            time_remaining: config.initial_time,
            fall_position: 0.0,
            horizontal_position: 0.0,
            sprite_variant: 0,
            challenge: Challenge {
                entry,
                display: mode.display_mode(),
                draw: 1,
            },
            outcome: RoundOutcome::Playing,
            last_outcome: None,
            clock: RoundClock::new(&config),
        };
        round.respawn_sprite(rng);
        info_log!(
            "Round started in {} with challenge '{}'",
            mode.label(),
            round.challenge.entry.acronym
        );
        Ok(round)
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> i32 {
        self.time_remaining
    }

    #[must_use]
    pub fn fall_position(&self) -> f32 {
        self.fall_position
    }

    #[must_use]
    pub fn horizontal_position(&self) -> f32 {
        self.horizontal_position
    }

    #[must_use]
    pub fn sprite_variant(&self) -> usize {
        self.sprite_variant
    }

    #[must_use]
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    #[must_use]
    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.outcome == RoundOutcome::Playing
    }

    /// One elapsed second.
    pub fn timer_tick(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.time_remaining -= 1;
        self.check_terminal();
    }

    /// One fall cadence step at the mode's speed.
    pub fn fall_tick(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.fall_position += self.mode.fall_speed(&self.config);
        self.check_terminal();
    }

    /// Polls the round clocks and applies whatever ticks are due, then checks
    /// the end condition.
    pub fn advance(&mut self, now: Instant) -> Ticks {
        if !self.is_playing() {
            return Ticks::default();
        }
        let ticks = self.clock.poll(now);
        if ticks.timer {
            self.timer_tick();
        }
        if ticks.fall {
            self.fall_tick();
        }
        self.check_terminal();
        ticks
    }

    /// Applies a committed answer. Returns `None` once the round is over.
    ///
    /// A hit draws the next challenge before touching score or timer, so a
    /// failed draw leaves the round unchanged.
    pub fn commit<R: Rng>(
        &mut self,
        input: &str,
        dictionary: &AcronymDictionary,
        rng: &mut R,
    ) -> Result<Option<Outcome>> {
        if !self.is_playing() {
            return Ok(None);
        }

        let outcome = matcher::evaluate(self.mode.policy(), input, &self.challenge, dictionary);
        match outcome {
            Outcome::Hit => {
                let entry = dictionary.pick_random(rng)?;
                self.challenge = Challenge {
                    entry,
                    display: self.mode.display_mode(),
                    draw: self.challenge.draw + 1,
                };
                self.score += self.config.score_step;
                self.time_remaining += self.config.hit_time_bonus;
                self.respawn_sprite(rng);
                debug_log!(
                    "Hit on '{}': score {}, time {}",
                    input,
                    self.score,
                    self.time_remaining
                );
            }
            Outcome::Miss => {
                self.score -= self.config.score_step;
                self.fall_position += self.config.miss_drop;
                debug_log!(
                    "Miss on '{}': score {}, fall {}",
                    input,
                    self.score,
                    self.fall_position
                );
            }
            Outcome::QuitRequested => {
                debug_log!("Quit requested during round");
            }
        }

        self.last_outcome = Some(outcome);
        self.check_terminal();
        Ok(Some(outcome))
    }

    fn respawn_sprite<R: Rng>(&mut self, rng: &mut R) {
        self.fall_position = 0.0;
        self.horizontal_position = rng.gen_range(0.0..=self.config.playfield.max_horizontal());
        self.sprite_variant = rng.gen_range(0..SPRITE_VARIANTS);
    }

    fn check_terminal(&mut self) {
        if !self.is_playing() {
            return;
        }
        if self.time_remaining <= 0 {
            self.outcome = RoundOutcome::TimeExpired;
        } else if self.fall_position >= self.config.playfield.bottom_boundary() {
            self.outcome = RoundOutcome::Caught;
        } else {
            return;
        }
        info_log!(
            "Round over ({:?}) with final score {}",
            self.outcome,
            self.score
        );
    }

    /// Status line for the last event of the round.
    #[must_use]
    pub fn feedback(&self) -> Option<String> {
        if !self.is_playing() {
            return Some(format!("Game Over! Final Score: {}", self.score));
        }
        match self.last_outcome? {
            Outcome::Hit => Some("Hit!".to_string()),
            Outcome::Miss => Some(self.mode.miss_message().to_string()),
            Outcome::QuitRequested => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dictionary() -> AcronymDictionary {
        AcronymDictionary::load_from_str(
            "CPU,Central Processing Unit\nRAM,Random Access Memory\nGPU,Graphics Processing Unit\n",
        )
    }

    fn new_round(mode: GameMode) -> (RoundState, AcronymDictionary, StdRng) {
        let dictionary = dictionary();
        let mut rng = StdRng::seed_from_u64(3);
        let round = RoundState::new(mode, RoundConfig::default(), &dictionary, &mut rng).unwrap();
        (round, dictionary, rng)
    }

    #[test]
    fn test_new_round_initial_state() {
        let (round, dictionary, _) = new_round(GameMode::Acronym);
        assert_eq!(round.score(), 0);
        assert_eq!(round.time_remaining(), 30);
        assert_eq!(round.fall_position(), 0.0);
        assert_eq!(round.outcome(), RoundOutcome::Playing);
        assert_eq!(round.challenge().draw, 1);
        assert!(dictionary.contains(&round.challenge().entry.acronym));
        assert!(round.horizontal_position() >= 0.0);
        assert!(round.horizontal_position() <= 700.0);
        assert!(round.sprite_variant() < SPRITE_VARIANTS);
    }

    #[test]
    fn test_new_round_empty_dictionary_fails() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = RoundState::new(
            GameMode::Acronym,
            RoundConfig::default(),
            &AcronymDictionary::new(),
            &mut rng,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_display_mode_per_game_mode() {
        let (round, _, _) = new_round(GameMode::Acronym);
        assert_eq!(round.challenge().prompt(), round.challenge().entry.full_name);
        let (round, _, _) = new_round(GameMode::Term);
        assert_eq!(round.challenge().prompt(), round.challenge().entry.acronym);
        let (round, _, _) = new_round(GameMode::Challenge);
        assert_eq!(round.challenge().display, DisplayMode::ShowFullName);
    }

    #[test]
    fn test_hit_scores_and_extends_timer() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Acronym);
        round.fall_tick();
        let outcome = round.commit("CPU", &dictionary, &mut rng).unwrap();
        assert_eq!(outcome, Some(Outcome::Hit));
        assert_eq!(round.score(), 100);
        assert_eq!(round.time_remaining(), 35);
        assert_eq!(round.fall_position(), 0.0);
        assert_eq!(round.challenge().draw, 2);
        assert_eq!(round.feedback().as_deref(), Some("Hit!"));
    }

    #[test]
    fn test_miss_penalises_and_drops_sprite() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Acronym);
        let outcome = round.commit("NOPE", &dictionary, &mut rng).unwrap();
        assert_eq!(outcome, Some(Outcome::Miss));
        assert_eq!(round.score(), -100);
        assert_eq!(round.time_remaining(), 30);
        assert_eq!(round.fall_position(), 45.0);
        assert_eq!(round.challenge().draw, 1);
        assert_eq!(round.feedback().as_deref(), Some("Missed!"));
    }

    #[test]
    fn test_term_mode_miss_message() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Term);
        round.commit("CPU", &dictionary, &mut rng).unwrap();
        assert_eq!(round.feedback().as_deref(), Some("Incorrect! Try again."));
    }

    #[test]
    fn test_term_mode_hit_on_full_name() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Term);
        let answer = round.challenge().entry.full_name.to_uppercase();
        let outcome = round.commit(&answer, &dictionary, &mut rng).unwrap();
        assert_eq!(outcome, Some(Outcome::Hit));
        assert_eq!(round.score(), 100);
    }

    #[test]
    fn test_score_is_order_independent() {
        let sequences = [
            ["CPU", "x", "RAM", "y", "GPU"],
            ["x", "y", "CPU", "RAM", "GPU"],
            ["GPU", "RAM", "CPU", "x", "y"],
        ];
        for inputs in sequences {
            let (mut round, dictionary, mut rng) = new_round(GameMode::Acronym);
            for input in inputs {
                round.commit(input, &dictionary, &mut rng).unwrap();
            }
            assert_eq!(round.score(), 100 * 3 - 100 * 2);
        }
    }

    #[test]
    fn test_quit_does_not_mutate() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Term);
        let outcome = round.commit("q", &dictionary, &mut rng).unwrap();
        assert_eq!(outcome, Some(Outcome::QuitRequested));
        assert_eq!(round.score(), 0);
        assert_eq!(round.fall_position(), 0.0);
        assert!(round.is_playing());
    }

    #[test]
    fn test_timer_expiry_ends_round() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Term);
        round.commit("x", &dictionary, &mut rng).unwrap();
        for _ in 0..30 {
            round.timer_tick();
        }
        assert_eq!(round.time_remaining(), 0);
        assert_eq!(round.outcome(), RoundOutcome::TimeExpired);
        assert_eq!(round.score(), -100);
        assert_eq!(round.feedback().as_deref(), Some("Game Over! Final Score: -100"));
        // Terminal state absorbs further ticks and commits.
        round.timer_tick();
        assert_eq!(round.time_remaining(), 0);
        assert_eq!(round.commit("CPU", &dictionary, &mut rng).unwrap(), None);
        assert_eq!(round.score(), -100);
    }

    #[test]
    fn test_fall_speed_per_mode() {
        let (mut round, _, _) = new_round(GameMode::Acronym);
        round.fall_tick();
        assert_eq!(round.fall_position(), 0.75);

        let (mut round, _, _) = new_round(GameMode::Challenge);
        round.fall_tick();
        assert_eq!(round.fall_position(), 1.75);

        let (mut round, _, _) = new_round(GameMode::Term);
        round.fall_tick();
        assert_eq!(round.fall_position(), 0.0);
    }

    #[test]
    fn test_sprite_reaching_bottom_ends_round() {
        let (mut round, _, _) = new_round(GameMode::Challenge);
        let mut previous = round.fall_position();
        while round.is_playing() {
            round.fall_tick();
            assert!(round.fall_position() >= previous);
            previous = round.fall_position();
        }
        assert_eq!(round.outcome(), RoundOutcome::Caught);
        assert!(round.fall_position() >= round.config().playfield.bottom_boundary());
    }

    #[test]
    fn test_misses_alone_can_end_round() {
        let (mut round, dictionary, mut rng) = new_round(GameMode::Term);
        // 500 / 45 rounds up to 12 misses.
        for _ in 0..11 {
            round.commit("wrong", &dictionary, &mut rng).unwrap();
            assert!(round.is_playing());
        }
        round.commit("wrong", &dictionary, &mut rng).unwrap();
        assert_eq!(round.outcome(), RoundOutcome::Caught);
        assert_eq!(round.score(), -1200);
    }

    #[test]
    fn test_advance_polls_clocks() {
        let (mut round, _, _) = new_round(GameMode::Acronym);
        let start = Instant::now();
        assert_eq!(round.advance(start), Ticks::default());

        let ticks = round.advance(start + Duration::from_millis(20));
        assert!(ticks.fall);
        assert!(!ticks.timer);
        assert_eq!(round.fall_position(), 0.75);

        let ticks = round.advance(start + Duration::from_millis(1000));
        assert!(ticks.timer);
        assert_eq!(round.time_remaining(), 29);
    }

    #[test]
    fn test_ticker_fires_once_per_poll() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        assert!(!ticker.poll(start));
        // A long stall still yields a single tick, then the clock restarts.
        assert!(ticker.poll(start + Duration::from_secs(5)));
        assert!(!ticker.poll(start + Duration::from_millis(5500)));
        assert!(ticker.poll(start + Duration::from_secs(6)));
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(GameMode::from_key('1'), Some(GameMode::Acronym));
        assert_eq!(GameMode::from_key('2'), Some(GameMode::Term));
        assert_eq!(GameMode::from_key('3'), Some(GameMode::Challenge));
        assert_eq!(GameMode::from_key('4'), None);
        for mode in [GameMode::Acronym, GameMode::Term, GameMode::Challenge] {
            assert_eq!(GameMode::from_key(mode.key()), Some(mode));
        }
        assert_eq!(GameMode::Challenge.policy(), MatchPolicy::ExactKeyMembership);
        assert_eq!(GameMode::Term.policy(), MatchPolicy::ExactFullNameEquality);
    }
}
