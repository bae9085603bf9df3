#![allow(dead_code)]
//! Players and the roster that owns them
//!
//! The host is held by name, not by reference, and is re-checked whenever
//! the roster changes: removing the host leaves the game without one.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A player in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub eliminated: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eliminated: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }
}

/// Ordered list of unique, trimmed, non-empty player names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
    host: Option<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster from a list of names; the first becomes host.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add_player(name.as_ref());
        }
        roster
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Players still in the game, in roster order
    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Add a player. Blank and duplicate names are ignored. The first
    /// player added becomes host. Returns whether the player was added.
    pub fn add_player(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        if self.players.is_empty() {
            self.host = Some(name.to_string());
        }
        self.players.push(Player::new(name));
        true
    }

    /// Remove a player. Everyone left is marked eliminated, so a fresh
    /// game has to be started; removing the host unsets it.
    pub fn remove_player(&mut self, name: &str) {
        let name = name.trim();
        self.players.retain(|p| p.name != name);
        for player in &mut self.players {
            player.eliminated = true;
        }
        if self.host.as_deref() == Some(name) {
            debug!(host = name, "host removed from roster");
            self.host = None;
        }
    }

    /// Make an existing player host. Unknown names are ignored.
    pub fn set_host(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.contains(name) {
            return false;
        }
        self.host = Some(name.to_string());
        true
    }

    /// Mark a player eliminated. Returns false for unknown names.
    pub fn eliminate(&mut self, name: &str) -> bool {
        let name = name.trim();
        match self.players.iter_mut().find(|p| p.name == name) {
            Some(player) => {
                player.eliminated = true;
                true
            }
            None => false,
        }
    }

    /// Replace all players, trimming and dropping blanks and duplicates.
    pub fn set_players<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.players.clear();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !self.contains(name) {
                self.players.push(Player::new(name));
            }
        }
        if self.host.as_deref().is_some_and(|h| !self.contains(h)) {
            self.host = None;
        }
    }

    /// Bring every player back into the game
    pub fn reset_eliminated(&mut self) {
        for player in &mut self.players {
            player.eliminated = false;
        }
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.host = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_player_is_host() {
        let mut roster = Roster::new();
        assert!(roster.add_player("  Alice "));
        assert!(roster.add_player("Bob"));
        assert_eq!(roster.host(), Some("Alice"));
        assert_eq!(roster.players()[0].name, "Alice");
    }

    #[test]
    fn test_blank_and_duplicate_ignored() {
        let mut roster = Roster::from_names(["Alice"]);
        assert!(!roster.add_player("   "));
        assert!(!roster.add_player("Alice "));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_remove_host_unsets_host() {
        let mut roster = Roster::from_names(["Alice", "Bob"]);
        roster.remove_player("Alice");
        assert_eq!(roster.host(), None);
        assert_eq!(roster.len(), 1);
        assert!(roster.players()[0].eliminated);
    }

    #[test]
    fn test_remove_other_keeps_host() {
        let mut roster = Roster::from_names(["Alice", "Bob"]);
        roster.remove_player("Bob");
        assert_eq!(roster.host(), Some("Alice"));
    }

    #[test]
    fn test_set_host_requires_member() {
        let mut roster = Roster::from_names(["Alice", "Bob"]);
        assert!(!roster.set_host("Carol"));
        assert!(roster.set_host(" Bob "));
        assert_eq!(roster.host(), Some("Bob"));
    }

    #[test]
    fn test_eliminate_and_reset() {
        let mut roster = Roster::from_names(["Alice", "Bob", "Carol"]);
        assert!(roster.eliminate("Bob"));
        assert!(!roster.eliminate("Dave"));
        assert_eq!(roster.alive_count(), 2);
        roster.reset_eliminated();
        assert_eq!(roster.alive_count(), 3);
    }

    #[test]
    fn test_set_players_dedupes_and_revalidates_host() {
        let mut roster = Roster::from_names(["Alice"]);
        roster.set_players([" Bob", "Carol", "Bob", ""]);
        let names: Vec<&str> = roster.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol"]);
        assert_eq!(roster.host(), None);
    }

    #[test]
    fn test_clear() {
        let mut roster = Roster::from_names(["Alice", "Bob"]);
        roster.clear();
        assert!(roster.is_empty());
        assert_eq!(roster.host(), None);
    }
}
