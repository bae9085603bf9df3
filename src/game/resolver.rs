//! End-condition resolver
//!
//! Classifies the game after anything that can shrink the set of alive
//! players or exhaust the words.

use super::roster::Player;
use serde::{Deserialize, Serialize};

/// Game status after an elimination or a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Several players alive and words remain
    Continue,
    /// One player alive with words remaining: they must find a word to win
    SinglePlayer(String),
    /// The game is over with one winner
    Winner(String),
    /// The game is over with every alive player winning
    Winners(Vec<String>),
    /// Everyone was eliminated
    NoWinner,
}

impl Classification {
    /// Whether this classification ends the game
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Classification::Winner(_) | Classification::Winners(_) | Classification::NoWinner
        )
    }
}

/// Classify the game given the roster and how many words are still available.
pub fn classify(players: &[Player], available_words: usize) -> Classification {
    let mut alive: Vec<String> = players
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.name.clone())
        .collect();

    match (alive.len(), available_words) {
        (0, _) => Classification::NoWinner,
        (1, 0) => Classification::Winner(alive.remove(0)),
        (1, _) => Classification::SinglePlayer(alive.remove(0)),
        (_, 0) => Classification::Winners(alive),
        _ => Classification::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(spec: &[(&str, bool)]) -> Vec<Player> {
        spec.iter()
            .map(|(name, eliminated)| Player {
                name: name.to_string(),
                eliminated: *eliminated,
            })
            .collect()
    }

    #[test]
    fn test_no_winner_when_everyone_out() {
        let p = players(&[("A", true), ("B", true)]);
        assert_eq!(classify(&p, 5), Classification::NoWinner);
        assert_eq!(classify(&p, 0), Classification::NoWinner);
        assert_eq!(classify(&[], 0), Classification::NoWinner);
    }

    #[test]
    fn test_single_player_with_words() {
        let p = players(&[("A", true), ("B", false)]);
        assert_eq!(classify(&p, 3), Classification::SinglePlayer("B".to_string()));
    }

    #[test]
    fn test_single_player_without_words_wins() {
        let p = players(&[("A", false), ("B", true)]);
        assert_eq!(classify(&p, 0), Classification::Winner("A".to_string()));
    }

    #[test]
    fn test_multiple_alive_without_words_all_win() {
        let p = players(&[("A", false), ("B", true), ("C", false)]);
        assert_eq!(
            classify(&p, 0),
            Classification::Winners(vec!["A".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn test_continue() {
        let p = players(&[("A", false), ("B", false)]);
        assert_eq!(classify(&p, 1), Classification::Continue);
    }

    #[test]
    fn test_winner_kinds_only_when_words_exhausted() {
        for alive in 0..4 {
            let spec: Vec<(&str, bool)> = ["A", "B", "C"]
                .iter()
                .enumerate()
                .map(|(i, n)| (*n, i >= alive))
                .collect();
            let p = players(&spec);
            for words in [0usize, 1, 7] {
                let c = classify(&p, words);
                assert_eq!(c == Classification::NoWinner, alive == 0);
                let winner_kind = matches!(c, Classification::Winner(_) | Classification::Winners(_));
                assert_eq!(winner_kind, words == 0 && alive >= 1);
            }
        }
    }

    #[test]
    fn test_terminal() {
        assert!(Classification::NoWinner.is_terminal());
        assert!(!Classification::SinglePlayer("A".into()).is_terminal());
        assert!(!Classification::Continue.is_terminal());
    }
}
