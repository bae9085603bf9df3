#![allow(dead_code)]
//! Turn and letter transitions
//!
//! After an accepted word the turn goes to the next alive player and a new
//! letter is drawn from the end of the word. After an elimination only the
//! player changes: round and letter stay as they are.

use super::pack::{starts_with_letter, to_upper, Word};
use super::roster::Player;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Letter used when there is nothing to draw from
pub const FALLBACK_LETTER: char = 'A';

/// Who plays next and with which letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAdvance {
    pub player: String,
    pub letter: char,
}

/// Advance after `current` played `last_word`.
///
/// Rotation runs over alive players in roster order, starting after
/// `current` (or from the first alive player if `current` is not alive).
/// Returns `None` when nobody is alive.
pub fn next_turn<R: Rng + ?Sized>(
    players: &[Player],
    current: &str,
    last_word: &str,
    available_words: &[&str],
    rng: &mut R,
) -> Option<TurnAdvance> {
    let alive: Vec<&str> = players
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.name.as_str())
        .collect();
    if alive.is_empty() {
        return None;
    }

    let index = alive.iter().position(|n| *n == current).unwrap_or(0);
    let player = alive[(index + 1) % alive.len()].to_string();
    let letter = next_letter(last_word, available_words, rng);

    Some(TurnAdvance { player, letter })
}

/// Pick the letter for the next turn.
///
/// Scans `last_word` from its end for the first letter that still starts
/// an available word. If none does, picks at random among the starting
/// letters of the available words.
pub fn next_letter<R: Rng + ?Sized>(last_word: &str, available_words: &[&str], rng: &mut R) -> char {
    let last = last_word.trim();

    let scanned = last
        .chars()
        .rev()
        .filter(|c| c.is_alphabetic())
        .find(|&c| available_words.iter().any(|w| starts_with_letter(w, c)));
    if let Some(letter) = scanned {
        return to_upper(letter);
    }

    let mut initials: Vec<char> = Vec::new();
    for word in available_words {
        if let Some(c) = word.chars().next().map(to_upper) {
            if !initials.contains(&c) {
                initials.push(c);
            }
        }
    }

    initials
        .choose(rng)
        .copied()
        .or_else(|| last.chars().last().map(to_upper))
        .unwrap_or(FALLBACK_LETTER)
}

/// Letter for the first turn: a random initial among all pack words.
pub fn initial_letter<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> char {
    let mut initials: Vec<char> = Vec::new();
    for c in words.iter().filter_map(Word::initial) {
        if !initials.contains(&c) {
            initials.push(c);
        }
    }
    initials.choose(rng).copied().unwrap_or(FALLBACK_LETTER)
}

/// Next alive player strictly after `eliminated` in roster order.
///
/// Wraps around; if `eliminated` is not in the roster the scan starts at
/// the first player. Returns `None` when nobody is alive.
pub fn next_player_after_elimination(players: &[Player], eliminated: &str) -> Option<String> {
    if players.is_empty() {
        return None;
    }
    let start = players
        .iter()
        .position(|p| p.name == eliminated)
        .map(|i| i + 1)
        .unwrap_or(0);

    (0..players.len())
        .map(|k| &players[(start + k) % players.len()])
        .find(|p| p.is_alive())
        .map(|p| p.name.clone())
}
