//! Application state management

use super::screen::{Screen, SetupItem};
use crate::config::{PackSelection, Settings};
use crate::game::budget::Speed;
use crate::game::engine::{GameSnapshot, GameState, SubmitError};
use crate::game::pack::WordPack;
use crate::game::resolver::Classification;
use crate::game::validation::Rejection;
use crate::storage::{Storage, StorageError};
use tracing::{info, warn};

/// Longest player name accepted on the setup screen
pub const MAX_NAME_LEN: usize = 16;

/// How a feedback line should read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Bad,
    Warn,
    Info,
}

/// One line of feedback under the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
}

impl Feedback {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    pub screen: Screen,
    /// Current text input: a word while playing, a name during setup
    pub input: String,
    pub feedback: Option<Feedback>,
    game: GameState,
    packs: Vec<WordPack>,
    selection: PackSelection,
    storage: Option<Storage>,
}

impl App {
    /// App over a ready game. `selection` names the pack `game` was built from.
    pub fn new(game: GameState, packs: Vec<WordPack>, selection: PackSelection) -> Self {
        Self {
            should_quit: false,
            screen: Screen::setup(),
            input: String::new(),
            feedback: None,
            game,
            packs,
            selection,
            storage: None,
        }
    }

    /// Persist roster, settings, pack choice and the running game here
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn packs(&self) -> &[WordPack] {
        &self.packs
    }

    pub fn selection(&self) -> &PackSelection {
        &self.selection
    }

    pub fn current_pack(&self) -> Option<&WordPack> {
        self.packs
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&self.selection.name))
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pick up a game saved by an earlier run.
    ///
    /// Finished games, games whose players are not all known and games
    /// played with another pack or language are ignored.
    pub fn resume(&mut self, snapshot: GameSnapshot) -> bool {
        if snapshot.session.is_ended() || snapshot.session.current_letter.is_none() {
            return false;
        }
        let roster_matches = snapshot.roster.len() == self.game.roster().len()
            && snapshot
                .roster
                .players()
                .iter()
                .all(|p| self.game.roster().contains(&p.name));
        if !roster_matches {
            warn!("saved game does not match the roster, starting fresh");
            return false;
        }
        if snapshot.pack.as_ref() != Some(&self.selection) {
            warn!(saved = ?snapshot.pack, "saved game used another pack, starting fresh");
            return false;
        }

        self.game.restore(snapshot);
        if self.game.settings().has_timer {
            self.game.timer_mut().start(None);
        }
        self.screen = Screen::Playing;
        info!(round = self.game.session().current_round, "resumed saved game");
        true
    }

    /// Handle character input
    pub fn on_char(&mut self, c: char) {
        let accepts = match &self.screen {
            Screen::Setup { .. } => {
                self.screen.setup_item() == Some(SetupItem::Players)
                    && self.input.chars().count() < MAX_NAME_LEN
            }
            Screen::Playing => !self.game.is_over(),
            Screen::Result => false,
        };
        if accepts {
            self.input.push(c);
            self.feedback = None;
        }
    }

    pub fn on_backspace(&mut self) {
        self.input.pop();
    }

    /// Enter: act on the highlighted row, submit the word, or play again
    pub fn on_submit(&mut self) {
        match self.screen {
            Screen::Setup { .. } => self.setup_select(),
            Screen::Playing => self.submit_word(),
            Screen::Result => self.play_again(),
        }
    }

    /// Esc: leave the current screen
    pub fn on_escape(&mut self) {
        match self.screen {
            Screen::Setup { .. } => self.quit(),
            Screen::Playing => {
                info!("game abandoned");
                self.back_to_setup();
            }
            Screen::Result => self.back_to_setup(),
        }
    }

    pub fn on_up(&mut self) {
        if let Screen::Setup { selected, .. } = &mut self.screen {
            *selected = selected.saturating_sub(1);
        }
    }

    pub fn on_down(&mut self) {
        if let Screen::Setup { selected, .. } = &mut self.screen {
            if *selected + 1 < SetupItem::all().len() {
                *selected += 1;
            }
        }
    }

    pub fn on_left(&mut self) {
        self.adjust(-1);
    }

    pub fn on_right(&mut self) {
        self.adjust(1);
    }

    /// Delete: remove the highlighted player
    pub fn on_delete(&mut self) {
        let Screen::Setup { player_cursor, .. } = self.screen else {
            return;
        };
        if self.screen.setup_item() != Some(SetupItem::Players) {
            return;
        }
        let Some(name) = self
            .game
            .roster()
            .players()
            .get(player_cursor)
            .map(|p| p.name.clone())
        else {
            return;
        };

        self.game.roster_mut().remove_player(&name);
        let len = self.game.roster().len();
        if let Screen::Setup { player_cursor, .. } = &mut self.screen {
            *player_cursor = (*player_cursor).min(len.saturating_sub(1));
        }
        self.feedback = Some(Feedback::new(format!("Removed {}", name), Tone::Info));
        self.save_players();
    }

    /// The current player gives up their turn and leaves the game
    pub fn leave_current(&mut self) {
        if self.screen != Screen::Playing || self.game.is_over() {
            return;
        }
        let Some(name) = self.game.current_player().map(str::to_string) else {
            return;
        };
        match self.game.leave(&name) {
            Ok(classification) => {
                self.feedback = Some(Feedback::new(format!("{} left the game", name), Tone::Info));
                self.after_move(&classification);
            }
            Err(e) => self.feedback = Some(Feedback::new(e.to_string(), Tone::Warn)),
        }
    }

    /// Poll the turn timer
    pub fn tick(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        let timed_out = self.game.current_player().map(str::to_string);
        if let Some(classification) = self.game.tick() {
            if let Some(name) = timed_out {
                self.feedback = Some(Feedback::new(
                    format!("{} ran out of time", name),
                    Tone::Warn,
                ));
            }
            self.input.clear();
            self.after_move(&classification);
        }
    }

    /// Start a new game with the current roster
    pub fn start_game(&mut self) {
        if self.game.roster().is_empty() {
            self.feedback = Some(Feedback::new("Add at least one player", Tone::Warn));
            return;
        }
        match self.game.start_game() {
            Ok(()) => {
                self.screen = Screen::Playing;
                self.input.clear();
                self.feedback = None;
                self.save_session();
            }
            Err(e) => self.feedback = Some(Feedback::new(e.to_string(), Tone::Bad)),
        }
    }

    pub fn play_again(&mut self) {
        self.start_game();
    }

    /// One line describing how the game ended
    pub fn result_message(&self) -> String {
        let session = self.game.session();
        if let Some(winner) = session.winner() {
            format!("{} wins!", winner)
        } else if !session.winners().is_empty() {
            format!("{} win!", session.winners().join(", "))
        } else {
            "Nobody wins".to_string()
        }
    }

    fn submit_word(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        // On rejection the text stays so it can be corrected
        let input = self.input.clone();
        match self.game.submit(&input) {
            Ok(accepted) => {
                self.input.clear();
                let text = if accepted.exact {
                    format!("OK {}", accepted.word)
                } else {
                    format!("OK {} (from \"{}\")", accepted.word, input.trim())
                };
                self.feedback = Some(Feedback::new(text, Tone::Good));
                self.after_move(&accepted.classification);
            }
            Err(SubmitError::Rejected(rejection @ Rejection::AlreadyUsed { .. })) => {
                self.feedback = Some(Feedback::new(rejection.to_string(), Tone::Warn));
            }
            Err(SubmitError::Rejected(rejection)) => {
                self.feedback = Some(Feedback::new(rejection.to_string(), Tone::Bad));
            }
            Err(e) => self.feedback = Some(Feedback::new(e.to_string(), Tone::Warn)),
        }
    }

    fn after_move(&mut self, classification: &Classification) {
        if classification.is_terminal() {
            self.screen = Screen::Result;
            self.persist(|s| s.clear_session());
        } else {
            self.save_session();
        }
    }

    fn back_to_setup(&mut self) {
        self.game.clear_session();
        self.screen = Screen::setup();
        self.input.clear();
        self.feedback = None;
        self.persist(|s| s.clear_session());
    }

    fn setup_select(&mut self) {
        match self.screen.setup_item() {
            Some(SetupItem::Players) => {
                if self.input.trim().is_empty() {
                    self.make_host();
                } else {
                    self.add_player();
                }
            }
            Some(SetupItem::Timer) => self.toggle_timer(),
            Some(SetupItem::WordsLeft) => {
                self.update_settings(|settings| settings.show_words_left = !settings.show_words_left)
            }
            Some(SetupItem::UsedWords) => {
                self.update_settings(|settings| settings.show_used_words = !settings.show_used_words)
            }
            Some(SetupItem::Sound) => {
                self.update_settings(|settings| settings.sound_enabled = !settings.sound_enabled)
            }
            Some(SetupItem::Start) => self.start_game(),
            Some(SetupItem::Quit) => self.quit(),
            Some(SetupItem::Pack | SetupItem::Language | SetupItem::Speed) => self.adjust(1),
            None => {}
        }
    }

    fn add_player(&mut self) {
        let name = std::mem::take(&mut self.input);
        let name = name.trim();
        if self.game.roster_mut().add_player(name) {
            let len = self.game.roster().len();
            if let Screen::Setup { player_cursor, .. } = &mut self.screen {
                *player_cursor = len - 1;
            }
            self.feedback = Some(Feedback::new(format!("Added {}", name), Tone::Info));
            self.save_players();
        } else {
            self.feedback = Some(Feedback::new(
                format!("{} is already playing", name),
                Tone::Warn,
            ));
        }
    }

    fn make_host(&mut self) {
        let Screen::Setup { player_cursor, .. } = self.screen else {
            return;
        };
        let Some(name) = self
            .game
            .roster()
            .players()
            .get(player_cursor)
            .map(|p| p.name.clone())
        else {
            return;
        };
        if self.game.roster_mut().set_host(&name) {
            self.feedback = Some(Feedback::new(format!("{} is the host", name), Tone::Info));
            self.save_players();
        }
    }

    fn adjust(&mut self, delta: isize) {
        match self.screen.setup_item() {
            Some(SetupItem::Players) => {
                let len = self.game.roster().len();
                if let Screen::Setup { player_cursor, .. } = &mut self.screen {
                    *player_cursor = step(*player_cursor, delta, len);
                }
            }
            Some(SetupItem::Pack) => self.cycle_pack(delta),
            Some(SetupItem::Language) => self.cycle_language(delta),
            Some(SetupItem::Speed) => {
                let speeds = Speed::all();
                let at = speeds
                    .iter()
                    .position(|s| *s == self.game.settings().speed)
                    .unwrap_or(0);
                let speed = speeds[step(at, delta, speeds.len())];
                self.update_settings(|settings| settings.speed = speed);
            }
            Some(
                SetupItem::Timer | SetupItem::WordsLeft | SetupItem::UsedWords | SetupItem::Sound,
            ) => self.setup_select(),
            _ => {}
        }
    }

    fn cycle_pack(&mut self, delta: isize) {
        if self.packs.is_empty() {
            return;
        }
        let at = self
            .packs
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(&self.selection.name))
            .unwrap_or(0);
        let pack = &self.packs[step(at, delta, self.packs.len())];
        let language = if pack.has_language(&self.selection.language) {
            self.selection.language.clone()
        } else {
            match pack.languages().next() {
                Some(language) => language.to_string(),
                None => return,
            }
        };
        let selection = PackSelection::new(pack.name.clone(), language);
        self.select_pack(selection);
    }

    fn cycle_language(&mut self, delta: isize) {
        let Some(pack) = self.current_pack() else {
            return;
        };
        let languages: Vec<&str> = pack.languages().collect();
        if languages.is_empty() {
            return;
        }
        let at = languages
            .iter()
            .position(|l| *l == self.selection.language)
            .unwrap_or(0);
        let selection = PackSelection::new(
            pack.name.clone(),
            languages[step(at, delta, languages.len())],
        );
        self.select_pack(selection);
    }

    fn select_pack(&mut self, selection: PackSelection) {
        let words = self
            .packs
            .iter()
            .find(|p| p.name == selection.name)
            .map(|p| p.lookup(&selection.language).map(<[_]>::to_vec));
        match words {
            Some(Ok(words)) => {
                info!(pack = %selection.name, language = %selection.language, "pack selected");
                self.game.set_words(words);
                self.selection = selection;
                let selection = self.selection.clone();
                self.persist(|s| s.save_pack(&selection));
            }
            Some(Err(e)) => self.feedback = Some(Feedback::new(e.to_string(), Tone::Bad)),
            None => {}
        }
    }

    fn toggle_timer(&mut self) {
        let has_timer = !self.game.settings().has_timer;
        self.update_settings(|settings| settings.has_timer = has_timer);
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) {
        let mut settings = self.game.settings().clone();
        change(&mut settings);
        self.persist(|s| s.save_settings(&settings));
        self.game.set_settings(settings);
    }

    fn save_players(&self) {
        let roster = self.game.roster().clone();
        self.persist(|s| s.save_players(&roster));
    }

    fn save_session(&self) {
        let snapshot = self.game.snapshot(Some(self.selection.clone()));
        self.persist(|s| s.save_session(&snapshot));
    }

    fn persist(&self, save: impl FnOnce(&Storage) -> Result<(), StorageError>) {
        if let Some(storage) = &self.storage {
            if let Err(e) = save(storage) {
                warn!(error = %e, "could not save");
            }
        }
    }
}

/// Move `at` by `delta` within `0..len`, wrapping around
fn step(at: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (at as isize + delta).rem_euclid(len as isize) as usize
}
