//! The game aggregate: roster, session, timer and the words in play
//!
//! Every rule-bearing event goes through [`GameState`]: a submitted word,
//! a timer running out, a player leaving. Each call runs to completion
//! before the next, so no locking is involved.

use super::pack::{starts_with_letter, PackError, Word, WordPack};
use super::resolver::{classify, Classification};
use super::roster::Roster;
use super::session::GameSession;
use super::turn;
use super::validation::{validate_detailed, MatchOutcome, Rejection};
use crate::config::Settings;
use crate::config::PackSelection;
use crate::timer::{Clock, Countdown, SystemClock, TimerEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from roster-level engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no player named {0}")]
    UnknownPlayer(String),
    #[error("{0} is already out of the game")]
    AlreadyEliminated(String),
    #[error("a game needs at least one player")]
    EmptyRoster,
    #[error(transparent)]
    Pack(#[from] PackError),
}

/// Why a submission was not applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("Time is not running right now")]
    TimeNotRunning,
    #[error("The game is over")]
    GameOver,
    #[error("The game has not started")]
    NotStarted,
}

/// An accepted submission and what it did to the game
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted {
    pub word: String,
    pub exact: bool,
    pub classification: Classification,
}

/// Roster and session as persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub roster: Roster,
    pub session: GameSession,
    /// Pack and language the game was played with; absent in older saves
    #[serde(default)]
    pub pack: Option<PackSelection>,
}

/// Everything one game needs, owned in one place
#[derive(Debug)]
pub struct GameState {
    roster: Roster,
    session: GameSession,
    timer: Countdown,
    timer_events: Receiver<TimerEvent>,
    words: Vec<Word>,
    settings: Settings,
    rng: StdRng,
}

impl GameState {
    /// Game over `words` with the system clock
    pub fn new(words: Vec<Word>, roster: Roster, settings: Settings) -> Self {
        Self::with_clock(words, roster, settings, Box::new(SystemClock))
    }

    pub fn with_clock(
        words: Vec<Word>,
        roster: Roster,
        settings: Settings,
        clock: Box<dyn Clock>,
    ) -> Self {
        let start = settings.start_seconds(words.len(), 1);
        let mut timer =
            Countdown::new(start, clock).with_resolution(settings.tick_resolution_ms());
        let timer_events = timer.subscribe();
        Self {
            roster,
            session: GameSession::new(),
            timer,
            timer_events,
            words,
            settings,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Game over a pack's word list for `language`
    pub fn from_pack(
        pack: &WordPack,
        language: &str,
        roster: Roster,
        settings: Settings,
    ) -> Result<Self, EngineError> {
        let words = pack.lookup(language)?.to_vec();
        Ok(Self::new(words, roster, settings))
    }

    /// Use a seeded random source for letter draws
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Roster for setup between games
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Countdown {
        &mut self.timer
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_player(&self) -> Option<&str> {
        self.session.current_player.as_deref()
    }

    pub fn current_letter(&self) -> Option<char> {
        self.session.current_letter
    }

    pub fn is_over(&self) -> bool {
        self.session.is_ended()
    }

    /// Pack words not played yet
    pub fn available_words(&self) -> Vec<&str> {
        self.session
            .unused(&self.words)
            .map(|w| w.main.as_str())
            .collect()
    }

    /// Unplayed pack words starting with the current letter
    pub fn available_for_current_letter(&self) -> Vec<&str> {
        let Some(letter) = self.session.current_letter else {
            return Vec::new();
        };
        self.session
            .unused(&self.words)
            .filter(|w| starts_with_letter(&w.main, letter))
            .map(|w| w.main.as_str())
            .collect()
    }

    pub fn words_left_for_current_letter(&self) -> usize {
        self.available_for_current_letter().len()
    }

    /// Swap in another word list. Any game in progress is dropped.
    pub fn set_words(&mut self, words: Vec<Word>) {
        self.words = words;
        self.clear_session();
    }

    /// Apply new settings; they take effect from the next timer start.
    pub fn set_settings(&mut self, settings: Settings) {
        self.timer.set_resolution(settings.tick_resolution_ms());
        self.settings = settings;
    }

    /// Begin a fresh game: everyone back in, first player up, random letter.
    pub fn start_game(&mut self) -> Result<(), EngineError> {
        let first = self
            .roster
            .players()
            .first()
            .map(|p| p.name.clone())
            .ok_or(EngineError::EmptyRoster)?;

        self.session.reset();
        self.roster.reset_eliminated();
        self.drain_timer_events();
        let letter = turn::initial_letter(&self.words, &mut self.rng);
        self.session.current_player = Some(first.clone());
        self.session.current_letter = Some(letter);

        let seconds = self.settings.start_seconds(self.words.len(), 1);
        if self.settings.has_timer {
            self.timer.restart(Some(seconds));
        } else {
            self.timer.reset(Some(seconds));
        }
        info!(player = %first, %letter, players = self.roster.len(), "game started");
        Ok(())
    }

    /// Start over with the same roster and words
    pub fn play_again(&mut self) -> Result<(), EngineError> {
        self.start_game()
    }

    /// Drop the finished game without starting another
    pub fn clear_session(&mut self) {
        self.session.reset();
        self.roster.reset_eliminated();
        self.timer.reset(None);
    }

    /// Check a submission without applying it.
    pub fn validate_submission(&self, input: &str) -> Result<MatchOutcome, SubmitError> {
        if self.session.is_ended() {
            return Err(SubmitError::GameOver);
        }
        let letter = self.session.current_letter.ok_or(SubmitError::NotStarted)?;
        if self.settings.has_timer && !self.timer.is_active() {
            return Err(SubmitError::TimeNotRunning);
        }
        let outcome = validate_detailed(input, letter, &self.words, self.session.used_words())?;
        Ok(outcome)
    }

    /// Validate and, if accepted, apply a submission for the current player.
    ///
    /// A duplicate submission marks the earlier entry as the pulsing word.
    pub fn submit(&mut self, input: &str) -> Result<Accepted, SubmitError> {
        let outcome = match self.validate_submission(input) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let SubmitError::Rejected(Rejection::AlreadyUsed { previous }) = &err {
                    self.session.pulsing_word = Some(previous.clone());
                }
                debug!(input, %err, "submission rejected");
                return Err(err);
            }
        };

        let classification = self.apply_successful_word(&outcome.word);
        Ok(Accepted {
            word: outcome.word,
            exact: outcome.exact,
            classification,
        })
    }

    /// Record an accepted word and move the game on.
    ///
    /// A lone survivor who finds a word wins. Otherwise, if no pack word
    /// is left every alive player wins; if words remain, the turn passes
    /// with a new letter and the round advances.
    pub fn apply_successful_word(&mut self, word: &str) -> Classification {
        self.session.record_word(word);
        self.session.pulsing_word = None;
        info!(word, player = ?self.session.current_player, "word accepted");

        let mut alive = self.roster.alive().map(|p| p.name.clone());
        if let (Some(survivor), None) = (alive.next(), alive.next()) {
            info!(winner = %survivor, "last player found a word");
            self.session.end_with_winner(survivor.clone());
            self.timer.stop();
            return Classification::Winner(survivor);
        }

        let remaining: Vec<&str> = self
            .words
            .iter()
            .filter(|w| !self.session.is_used(&w.main))
            .map(|w| w.main.as_str())
            .collect();
        let remaining_count = remaining.len();

        let classification = classify(self.roster.players(), remaining_count);
        match &classification {
            Classification::Winners(winners) => {
                info!(?winners, "pack exhausted");
                self.session.end_with_winners(winners.clone());
                self.timer.stop();
                return classification;
            }
            Classification::NoWinner => {
                self.session.end_without_winner();
                self.timer.stop();
                return classification;
            }
            _ => {}
        }

        let current = self.session.current_player.clone().unwrap_or_default();
        let advance = turn::next_turn(
            self.roster.players(),
            &current,
            word,
            &remaining,
            &mut self.rng,
        );
        let round = self.session.current_round;
        if let Some(advance) = advance {
            debug!(player = %advance.player, letter = %advance.letter, round = round + 1, "next turn");
            self.session.current_player = Some(advance.player);
            self.session.current_letter = Some(advance.letter);
            self.session.current_round = round + 1;
        }

        if self.settings.has_timer {
            let seconds = self.settings.start_seconds(remaining_count, round);
            self.timer.restart(Some(seconds));
        }
        classification
    }

    /// Knock a player out (timeout or leaving) and resolve the game.
    ///
    /// The turn passes to the next alive player after the eliminated one;
    /// round and letter stay the same.
    pub fn apply_elimination(&mut self, name: &str) -> Result<Classification, EngineError> {
        let name = name.trim();
        let player = self
            .roster
            .get(name)
            .ok_or_else(|| EngineError::UnknownPlayer(name.to_string()))?;
        if player.eliminated {
            return Err(EngineError::AlreadyEliminated(name.to_string()));
        }
        self.roster.eliminate(name);
        info!(player = name, "player eliminated");

        let available = self.words_left_for_current_letter();
        let classification = classify(self.roster.players(), available);
        match &classification {
            Classification::NoWinner => {
                info!("all players eliminated");
                self.session.end_without_winner();
                self.timer.stop();
            }
            Classification::Winner(winner) => {
                info!(%winner, "winner by default");
                self.session.end_with_winner(winner.clone());
                self.timer.stop();
            }
            Classification::Winners(winners) => {
                info!(?winners, "no words left for the letter");
                self.session.end_with_winners(winners.clone());
                self.timer.stop();
            }
            Classification::SinglePlayer(_) | Classification::Continue => {
                let next = turn::next_player_after_elimination(self.roster.players(), name);
                self.session.current_player = next;
                if self.settings.has_timer {
                    let remaining = self.session.unused(&self.words).count();
                    let seconds = self
                        .settings
                        .start_seconds(remaining, self.session.current_round);
                    self.timer.restart(Some(seconds));
                }
            }
        }
        Ok(classification)
    }

    /// A player leaves of their own accord
    pub fn leave(&mut self, name: &str) -> Result<Classification, EngineError> {
        self.apply_elimination(name)
    }

    /// Whether `name` is still in the game and can leave
    pub fn can_leave(&self, name: &str) -> bool {
        self.roster.get(name).is_some_and(|p| p.is_alive())
    }

    /// The current player ran out of time
    pub fn handle_timeout(&mut self) -> Option<Classification> {
        let current = self.session.current_player.clone()?;
        self.apply_elimination(&current).ok()
    }

    /// Poll the timer; eliminates the current player when it runs out.
    ///
    /// Expiry is read from the timer's `End` events, which also covers a
    /// turn that ended the moment it started.
    pub fn tick(&mut self) -> Option<Classification> {
        self.timer.poll();
        let expired = self.drain_timer_events();
        if !expired || !self.settings.has_timer || self.session.is_ended() {
            return None;
        }
        self.handle_timeout()
    }

    /// Empty the event queue; true if the timer ran out meanwhile
    fn drain_timer_events(&mut self) -> bool {
        self.timer_events
            .try_iter()
            .fold(false, |ended, event| ended || event == TimerEvent::End)
    }

    /// Roster and session, tagged with the pack they were played with
    pub fn snapshot(&self, pack: Option<PackSelection>) -> GameSnapshot {
        GameSnapshot {
            roster: self.roster.clone(),
            session: self.session.clone(),
            pack,
        }
    }

    /// Put back a saved roster and session. The timer is left stopped at
    /// the budget for the restored position; call [`Countdown::start`]
    /// to continue.
    pub fn restore(&mut self, snapshot: GameSnapshot) {
        self.roster = snapshot.roster;
        self.session = snapshot.session;
        self.drain_timer_events();
        let remaining = self.session.unused(&self.words).count();
        let seconds = self
            .settings
            .start_seconds(remaining, self.session.current_round);
        self.timer.reset(Some(seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pack::normalize;
    use crate::timer::{ManualClock, TimerStatus};

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.time_budget.fixed_override = Some(5);
        settings
    }

    fn game(words: &[&str], players: &[&str]) -> (GameState, ManualClock) {
        let clock = ManualClock::new(0);
        let mut state = GameState::with_clock(
            normalize(words.iter().copied()),
            Roster::from_names(players),
            settings(),
            Box::new(clock.clone()),
        )
        .with_seed(1);
        state.start_game().unwrap();
        (state, clock)
    }

    fn at_letter(state: &mut GameState, letter: char) {
        let mut snapshot = state.snapshot(None);
        snapshot.session.current_letter = Some(letter);
        state.restore(snapshot);
        state.timer_mut().start(None);
    }

    #[test]
    fn test_start_game() {
        let (state, _) = game(&["Cat", "Car"], &["A", "B"]);
        assert_eq!(state.current_player(), Some("A"));
        assert_eq!(state.current_letter(), Some('C'));
        assert_eq!(state.session().current_round, 1);
        assert_eq!(state.timer().status(), TimerStatus::Active);
        assert_eq!(state.timer().remaining(), 5);
    }

    #[test]
    fn test_start_needs_players() {
        let mut state = GameState::new(normalize(["Cat"]), Roster::new(), settings());
        assert_eq!(state.start_game(), Err(EngineError::EmptyRoster));
    }

    #[test]
    fn test_cat_then_car_scenario() {
        let (mut state, _) = game(&["Cat", "Car"], &["A", "B"]);
        let accepted = state.submit("Cat").unwrap();
        assert_eq!(accepted.word, "Cat");
        assert!(accepted.exact);
        assert_eq!(accepted.classification, Classification::Continue);
        assert_eq!(state.session().used_words(), ["Cat".to_string()]);
        assert_eq!(state.current_letter(), Some('C'));
        assert_eq!(state.current_player(), Some("B"));
        assert_eq!(state.session().current_round, 2);
    }

    #[test]
    fn test_last_word_makes_all_alive_winners() {
        let (mut state, _) = game(&["Cat", "Car"], &["A", "B", "C"]);
        state.submit("Cat").unwrap();
        let accepted = state.submit("Car").unwrap();
        assert_eq!(
            accepted.classification,
            Classification::Winners(vec!["A".into(), "B".into(), "C".into()])
        );
        assert!(state.is_over());
        assert_eq!(state.session().winners().len(), 3);
        assert_eq!(state.timer().status(), TimerStatus::Ended);
    }

    #[test]
    fn test_duplicate_sets_pulsing_word() {
        let (mut state, _) = game(&["Cat", "Car", "Cow"], &["A", "B"]);
        state.submit("Cat").unwrap();
        at_letter(&mut state, 'C');
        let err = state.submit("cat").unwrap_err();
        assert_eq!(
            err,
            SubmitError::Rejected(Rejection::AlreadyUsed {
                previous: "Cat".into()
            })
        );
        assert_eq!(state.session().pulsing_word.as_deref(), Some("Cat"));
        state.submit("Cow").unwrap();
        assert_eq!(state.session().pulsing_word, None);
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let (mut state, _) = game(&["Cat", "Car"], &["A", "B"]);
        let before = state.snapshot(None);
        assert!(state.submit("xyzzy").is_err());
        assert!(state.submit("").is_err());
        assert_eq!(state.snapshot(None), before);
    }

    #[test]
    fn test_submit_needs_running_timer() {
        let (mut state, _) = game(&["Cat", "Car"], &["A", "B"]);
        state.timer_mut().pause();
        assert_eq!(state.submit("Cat").unwrap_err(), SubmitError::TimeNotRunning);
    }

    #[test]
    fn test_no_timer_setting_allows_submission() {
        let mut settings = settings();
        settings.has_timer = false;
        let mut state =
            GameState::new(normalize(["Cat", "Car"]), Roster::from_names(["A", "B"]), settings)
                .with_seed(3);
        state.start_game().unwrap();
        assert_eq!(state.timer().status(), TimerStatus::Paused);
        assert!(state.submit("Cat").is_ok());
        assert!(state.tick().is_none());
    }

    #[test]
    fn test_timeout_eliminates_and_passes_turn() {
        let (mut state, clock) = game(&["Cat", "Car", "Dog", "Duck"], &["A", "B", "C"]);
        let letter = state.current_letter();
        clock.advance(5_000);
        let classification = state.tick();
        assert_eq!(classification, Some(Classification::Continue));
        assert!(state.roster().get("A").unwrap().eliminated);
        assert_eq!(state.current_player(), Some("B"));
        assert_eq!(state.current_letter(), letter);
        assert_eq!(state.session().current_round, 1);
        assert_eq!(state.timer().status(), TimerStatus::Active);
    }

    #[test]
    fn test_timeout_leaves_single_player() {
        let (mut state, clock) = game(&["Cat", "Car"], &["A", "B"]);
        clock.advance(5_000);
        assert_eq!(
            state.tick(),
            Some(Classification::SinglePlayer("B".into()))
        );
        assert!(!state.is_over());
        assert_eq!(state.current_player(), Some("B"));

        let accepted = state.submit("car").unwrap();
        assert_eq!(accepted.classification, Classification::Winner("B".into()));
        assert_eq!(state.session().winner(), Some("B"));
    }

    #[test]
    fn test_last_player_timing_out_means_no_winner() {
        let (mut state, clock) = game(&["Cat", "Car"], &["A"]);
        clock.advance(5_000);
        assert_eq!(state.tick(), Some(Classification::NoWinner));
        assert!(state.is_over());
        assert!(state.session().winner().is_none());
        clock.advance(5_000);
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn test_lone_survivor_without_words_wins_by_default() {
        let (mut state, _) = game(&["Cat", "Dog"], &["A", "B"]);
        at_letter(&mut state, 'C');
        state.submit("Cat").unwrap();
        assert_eq!(state.current_letter(), Some('D'));
        // B is up and the letter has no words left
        at_letter(&mut state, 'C');
        assert_eq!(state.words_left_for_current_letter(), 0);
        assert_eq!(state.leave("A").unwrap(), Classification::Winner("B".into()));
        assert_eq!(state.session().winner(), Some("B"));
    }

    #[test]
    fn test_leave_checks_player() {
        let (mut state, _) = game(&["Cat", "Car", "Cow"], &["A", "B", "C"]);
        assert_eq!(
            state.leave("Zed"),
            Err(EngineError::UnknownPlayer("Zed".into()))
        );
        assert!(state.can_leave("B"));
        assert_eq!(state.leave("B").unwrap(), Classification::Continue);
        assert!(!state.can_leave("B"));
        assert_eq!(
            state.leave("B"),
            Err(EngineError::AlreadyEliminated("B".into()))
        );
        assert_eq!(state.current_player(), Some("C"));
    }

    #[test]
    fn test_play_again_resets() {
        let (mut state, clock) = game(&["Cat", "Car"], &["A", "B"]);
        state.submit("Cat").unwrap();
        clock.advance(5_000);
        state.tick();
        state.play_again().unwrap();
        assert!(state.session().used_words().is_empty());
        assert_eq!(state.roster().alive_count(), 2);
        assert_eq!(state.current_player(), Some("A"));
        assert_eq!(state.session().current_round, 1);
    }

    #[test]
    fn test_submit_after_game_over() {
        let (mut state, clock) = game(&["Cat", "Car"], &["A"]);
        clock.advance(5_000);
        state.tick();
        assert_eq!(state.submit("Cat").unwrap_err(), SubmitError::GameOver);
    }

    #[test]
    fn test_from_pack_missing_language() {
        let pack = crate::game::packs::find("US States").unwrap();
        let err = GameState::from_pack(pack, "az", Roster::from_names(["A"]), settings())
            .unwrap_err();
        assert!(matches!(err, EngineError::Pack(PackError::MissingLanguage { .. })));
    }

    #[test]
    fn test_set_words_drops_game() {
        let (mut state, _) = game(&["Cat", "Car"], &["A", "B"]);
        state.submit("Cat").unwrap();
        state.set_words(normalize(["Dog"]));
        assert!(state.session().used_words().is_empty());
        assert_eq!(state.current_letter(), None);
        state.start_game().unwrap();
        assert_eq!(state.current_letter(), Some('D'));
    }

    #[test]
    fn test_zero_second_turn_still_eliminates() {
        let clock = ManualClock::new(0);
        let mut settings = settings();
        settings.time_budget.fixed_override = Some(0);
        let mut state = GameState::with_clock(
            normalize(["Cat", "Car", "Cow"]),
            Roster::from_names(["A", "B"]),
            settings,
            Box::new(clock.clone()),
        )
        .with_seed(1);
        state.start_game().unwrap();
        assert_eq!(state.timer().remaining(), 1);

        clock.advance(1_000);
        assert_eq!(state.tick(), Some(Classification::SinglePlayer("B".into())));
        assert_eq!(state.roster().alive_count(), 1);
        assert!(state.submit("Car").is_ok());
        assert_eq!(state.session().winner(), Some("B"));
    }

    #[test]
    fn test_ended_timer_counts_as_expiry() {
        let (mut state, _) = game(&["Cat", "Car", "Dog", "Duck"], &["A", "B", "C"]);
        // A turn that ends the moment it starts
        state.timer_mut().restart(Some(0));
        assert_eq!(state.tick(), Some(Classification::Continue));
        assert!(state.roster().get("A").unwrap().eliminated);
        assert_eq!(state.current_player(), Some("B"));
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn test_restore_round_trip() {
        let (mut state, _) = game(&["Cat", "Car", "Cow"], &["A", "B"]);
        state.submit("Cat").unwrap();
        let snapshot = state.snapshot(Some(PackSelection::new("Animals", "en")));
        let (mut other, _) = game(&["Cat", "Car", "Cow"], &["X"]);
        other.restore(snapshot.clone());
        assert_eq!(other.snapshot(snapshot.pack.clone()), snapshot);
        assert_eq!(other.timer().status(), TimerStatus::Paused);
    }
}
