//! The in-progress game record

use super::pack::Word;
use serde::{Deserialize, Serialize};

/// State of one game from start to result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub current_player: Option<String>,
    /// Starts at 1, grows by one per accepted word
    pub current_round: u32,
    pub current_letter: Option<char>,
    /// Canonical words in submission order
    used_words: Vec<String>,
    ended: bool,
    winner: Option<String>,
    winners: Vec<String>,
    /// Previously used word to highlight after a duplicate submission
    pub pulsing_word: Option<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            current_player: None,
            current_round: 1,
            current_letter: None,
            used_words: Vec::new(),
            ended: false,
            winner: None,
            winners: Vec::new(),
            pulsing_word: None,
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial values
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn used_words(&self) -> &[String] {
        &self.used_words
    }

    pub fn record_word(&mut self, word: impl Into<String>) {
        self.used_words.push(word.into());
    }

    /// Exact (case-sensitive) membership, as used to filter pack words
    pub fn is_used(&self, main: &str) -> bool {
        self.used_words.iter().any(|w| w == main)
    }

    /// Pack words not yet played
    pub fn unused<'a>(&'a self, words: &'a [Word]) -> impl Iterator<Item = &'a Word> + 'a {
        words.iter().filter(move |w| !self.is_used(&w.main))
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn winners(&self) -> &[String] {
        &self.winners
    }

    /// End with no winner
    pub fn end_without_winner(&mut self) {
        self.ended = true;
        self.winner = None;
        self.winners.clear();
    }

    /// End with a single winner
    pub fn end_with_winner(&mut self, winner: impl Into<String>) {
        self.ended = true;
        self.winner = Some(winner.into());
        self.winners.clear();
    }

    /// End with every listed player winning
    pub fn end_with_winners(&mut self, winners: Vec<String>) {
        self.ended = true;
        self.winner = None;
        self.winners = winners;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pack::normalize;

    #[test]
    fn test_new_session() {
        let session = GameSession::new();
        assert_eq!(session.current_round, 1);
        assert!(!session.is_ended());
        assert!(session.winner().is_none());
        assert!(session.winners().is_empty());
    }

    #[test]
    fn test_winner_and_winners_exclusive() {
        let mut session = GameSession::new();
        session.end_with_winners(vec!["A".into(), "B".into()]);
        assert!(session.winner().is_none());
        session.end_with_winner("A");
        assert!(session.winners().is_empty());
        assert_eq!(session.winner(), Some("A"));
        session.end_without_winner();
        assert!(session.is_ended());
        assert!(session.winner().is_none() && session.winners().is_empty());
    }

    #[test]
    fn test_unused_is_case_sensitive() {
        let words = normalize(["Cat", "Car"]);
        let mut session = GameSession::new();
        session.record_word("cat");
        assert_eq!(session.unused(&words).count(), 2);
        session.record_word("Cat");
        let left: Vec<&str> = session.unused(&words).map(|w| w.main.as_str()).collect();
        assert_eq!(left, vec!["Car"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = GameSession::new();
        session.record_word("Cat");
        session.current_round = 4;
        session.end_with_winner("A");
        session.reset();
        assert_eq!(session, GameSession::default());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut session = GameSession::new();
        session.current_letter = Some('C');
        session.record_word("Cat");
        let json = serde_json::to_string(&session).unwrap();
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
