//! Word validation
//!
//! Validates a submitted word against, in order:
//! - Blank input
//! - The required starting letter
//! - The pack words starting with that letter
//! - Approximate match against those words
//! - Words already used this game
//!
//! A successful validation yields the canonical spelling from the pack,
//! never the raw input, so two differently mistyped submissions of the same
//! word are caught as duplicates.

use super::fuzzy;
use super::pack::{starts_with_letter, Word};
use thiserror::Error;

/// Why a submitted word was turned down
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Nothing but whitespace was submitted
    #[error("Word cannot be empty")]
    Empty,
    /// Input does not start with the current letter
    #[error("Word does not start with the letter {letter}")]
    WrongLetter { letter: char },
    /// The pack has no word starting with the current letter
    #[error("Word not found in pack")]
    NoCandidates { letter: char },
    /// No pack word is close enough to the input
    #[error("Word not found in pack")]
    NotFound,
    /// The matched word was already played; `previous` is the stored spelling
    #[error("Word already used")]
    AlreadyUsed { previous: String },
}

impl Rejection {
    /// Short category label
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::Empty => "Empty",
            Rejection::WrongLetter { .. } => "Wrong Letter",
            Rejection::NoCandidates { .. } => "No Candidates",
            Rejection::NotFound => "Not Found",
            Rejection::AlreadyUsed { .. } => "Already Used",
        }
    }
}

/// Details of an accepted word
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Canonical spelling from the pack
    pub word: String,
    pub score: f64,
    /// Input equals the canonical spelling, ignoring case
    pub exact: bool,
}

/// Validate `input` and return the canonical word it stands for.
pub fn validate(
    input: &str,
    letter: char,
    candidates: &[Word],
    used_words: &[String],
) -> Result<String, Rejection> {
    validate_detailed(input, letter, candidates, used_words).map(|m| m.word)
}

/// Like [`validate`], also reporting the match score and exactness.
pub fn validate_detailed(
    input: &str,
    letter: char,
    candidates: &[Word],
    used_words: &[String],
) -> Result<MatchOutcome, Rejection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }

    if !starts_with_letter(trimmed, letter) {
        return Err(Rejection::WrongLetter { letter });
    }

    let mut starting = candidates
        .iter()
        .filter(|w| w.starts_with_letter(letter))
        .peekable();
    if starting.peek().is_none() {
        return Err(Rejection::NoCandidates { letter });
    }

    let found = fuzzy::best_match(trimmed, starting).ok_or(Rejection::NotFound)?;

    if let Some(previous) = find_used(&found.word.main, used_words) {
        return Err(Rejection::AlreadyUsed {
            previous: previous.to_string(),
        });
    }

    Ok(MatchOutcome {
        word: found.word.main.clone(),
        score: found.score,
        exact: found.exact,
    })
}

/// The stored entry equal to `word`, ignoring case
pub fn find_used<'a>(word: &str, used_words: &'a [String]) -> Option<&'a str> {
    let lower = word.to_lowercase();
    used_words
        .iter()
        .find(|u| u.to_lowercase() == lower)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pack::normalize;

    fn pack() -> Vec<Word> {
        normalize(["Cat", "Car", "Dog", "California"])
    }

    #[test]
    fn test_valid_word_returns_canonical() {
        assert_eq!(validate("cat", 'C', &pack(), &[]), Ok("Cat".to_string()));
        assert_eq!(validate("  CAR  ", 'c', &pack(), &[]), Ok("Car".to_string()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(validate("   ", 'C', &pack(), &[]), Err(Rejection::Empty));
        assert_eq!(validate("", 'C', &pack(), &[]), Err(Rejection::Empty));
    }

    #[test]
    fn test_wrong_letter() {
        assert_eq!(
            validate("dog", 'C', &pack(), &[]),
            Err(Rejection::WrongLetter { letter: 'C' })
        );
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(
            validate("zebra", 'Z', &pack(), &[]),
            Err(Rejection::NoCandidates { letter: 'Z' })
        );
        assert_eq!(
            Rejection::NoCandidates { letter: 'Z' }.to_string(),
            "Word not found in pack"
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(validate("cxyzw", 'C', &pack(), &[]), Err(Rejection::NotFound));
    }

    #[test]
    fn test_fuzzy_typo_accepted() {
        assert_eq!(
            validate("Califronia", 'C', &pack(), &[]),
            Ok("California".to_string())
        );
        let outcome = validate_detailed("Califronia", 'C', &pack(), &[]).unwrap();
        assert!(!outcome.exact);
        assert!(outcome.score > 0.0);
    }

    #[test]
    fn test_resubmitting_accepted_word_is_already_used() {
        let words = pack();
        let mut used = Vec::new();
        let word = validate("cat", 'C', &words, &used).unwrap();
        used.push(word);
        assert_eq!(
            validate("cat", 'C', &words, &used),
            Err(Rejection::AlreadyUsed {
                previous: "Cat".to_string()
            })
        );
    }

    #[test]
    fn test_typo_of_used_word_is_already_used() {
        let words = pack();
        let used = vec!["California".to_string()];
        assert_eq!(
            validate("Kalifornia", 'C', &words, &used),
            Err(Rejection::WrongLetter { letter: 'C' })
        );
        assert_eq!(
            validate("Califronia", 'C', &words, &used),
            Err(Rejection::AlreadyUsed {
                previous: "California".to_string()
            })
        );
    }

    #[test]
    fn test_rejection_is_stable() {
        let words = pack();
        let used = vec!["Cat".to_string()];
        let first = validate("cxyzw", 'C', &words, &used);
        let second = validate("cxyzw", 'C', &words, &used);
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_empty_before_letter() {
        assert!(matches!(validate(" ", 'Z', &[], &[]), Err(Rejection::Empty)));
        assert!(matches!(
            validate("x", 'Z', &[], &[]),
            Err(Rejection::WrongLetter { .. })
        ));
    }

    #[test]
    fn test_labels_and_messages() {
        assert_eq!(Rejection::NotFound.label(), "Not Found");
        assert_eq!(
            Rejection::WrongLetter { letter: 'B' }.to_string(),
            "Word does not start with the letter B"
        );
        assert_eq!(
            Rejection::AlreadyUsed {
                previous: "Cat".to_string()
            }
            .to_string(),
            "Word already used"
        );
    }

    #[test]
    fn test_find_used_ignores_case() {
        let used = vec!["Cat".to_string()];
        assert_eq!(find_used("CAT", &used), Some("Cat"));
        assert_eq!(find_used("Car", &used), None);
    }
}
