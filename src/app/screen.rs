//! Application screens
//!
//! - Setup: roster, pack, language, speed, timer and display choices
//! - Playing: the game in progress
//! - Result: who won, with the option to play again

/// A row on the setup screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupItem {
    Players,
    Pack,
    Language,
    Speed,
    Timer,
    WordsLeft,
    UsedWords,
    Sound,
    Start,
    Quit,
}

impl SetupItem {
    /// Get all setup rows in order
    pub fn all() -> &'static [SetupItem] {
        &[
            SetupItem::Players,
            SetupItem::Pack,
            SetupItem::Language,
            SetupItem::Speed,
            SetupItem::Timer,
            SetupItem::WordsLeft,
            SetupItem::UsedWords,
            SetupItem::Sound,
            SetupItem::Start,
            SetupItem::Quit,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetupItem::Players => "Players",
            SetupItem::Pack => "Pack",
            SetupItem::Language => "Language",
            SetupItem::Speed => "Speed",
            SetupItem::Timer => "Timer",
            SetupItem::WordsLeft => "Word count",
            SetupItem::UsedWords => "Used words",
            SetupItem::Sound => "Sound",
            SetupItem::Start => "Start Game",
            SetupItem::Quit => "Quit",
        }
    }
}

/// The current application screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Setup {
        /// Index into [`SetupItem::all`]
        selected: usize,
        /// Highlighted player on the Players row
        player_cursor: usize,
    },
    Playing,
    Result,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::setup()
    }
}

impl Screen {
    pub fn setup() -> Self {
        Screen::Setup {
            selected: 0,
            player_cursor: 0,
        }
    }

    /// The highlighted setup row, if on the setup screen
    pub fn setup_item(&self) -> Option<SetupItem> {
        match self {
            Screen::Setup { selected, .. } => SetupItem::all().get(*selected).copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_starts_on_players() {
        assert_eq!(Screen::default().setup_item(), Some(SetupItem::Players));
        assert_eq!(Screen::Playing.setup_item(), None);
    }
}
