//! Approximate word matching
//!
//! Scores how well typed input matches a candidate text. 0.0 is a perfect
//! match and 1.0 is unrelated. The input may match anywhere inside the
//! candidate, so where a typo sits does not change the score: the cost is
//! the number of edits needed to turn the input into some substring of the
//! candidate, divided by the input length.

use super::pack::Word;

/// Scores above this are not a match
pub const ACCEPT_THRESHOLD: f64 = 0.4;

/// Inputs shorter than this never match
pub const MIN_MATCH_CHARS: usize = 2;

/// Best candidate found for an input
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub word: &'a Word,
    pub score: f64,
    /// Input equals the canonical spelling, ignoring case
    pub exact: bool,
}

/// Score `input` against `text`, case-insensitively.
pub fn score(input: &str, text: &str) -> f64 {
    let pattern: Vec<char> = input.chars().flat_map(char::to_lowercase).collect();
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let m = pattern.len();
    if m < MIN_MATCH_CHARS {
        return 1.0;
    }

    // Semi-global edit distance: free start and end inside `text`.
    let mut prev: Vec<usize> = vec![0; text.len() + 1];
    let mut row: Vec<usize> = vec![0; text.len() + 1];
    for (i, &p) in pattern.iter().enumerate() {
        row[0] = i + 1;
        for (j, &t) in text.iter().enumerate() {
            let substitute = prev[j] + usize::from(p != t);
            let skip_input = prev[j + 1] + 1;
            let skip_text = row[j] + 1;
            row[j + 1] = substitute.min(skip_input).min(skip_text);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    let errors = prev.iter().copied().min().unwrap_or(m).min(m);

    if m - errors < MIN_MATCH_CHARS {
        return 1.0;
    }
    errors as f64 / m as f64
}

/// Score `input` against a word: its canonical spelling and every matcher.
///
/// A matcher that matches the whole input counts as a perfect match.
pub fn word_score(input: &str, word: &Word) -> f64 {
    let mut best = score(input, &word.main);
    for matcher in &word.matchers {
        if best == 0.0 {
            break;
        }
        let s = if matcher.matches_whole(input) {
            0.0
        } else {
            score(input, &matcher.literal_text())
        };
        best = best.min(s);
    }
    best
}

/// Pick the lowest-scoring candidate within [`ACCEPT_THRESHOLD`].
///
/// Ties go to the candidate whose length is closest to the input, then to
/// the earliest candidate.
pub fn best_match<'a, I>(input: &str, candidates: I) -> Option<FuzzyMatch<'a>>
where
    I: IntoIterator<Item = &'a Word>,
{
    let input_len = input.chars().count();
    let mut best: Option<(f64, usize, &'a Word)> = None;

    for word in candidates {
        let s = word_score(input, word);
        let gap = word.main.chars().count().abs_diff(input_len);
        let better = match best {
            None => true,
            Some((bs, bg, _)) => s < bs || (s == bs && gap < bg),
        };
        if better {
            best = Some((s, gap, word));
        }
    }

    best.filter(|(s, _, _)| *s <= ACCEPT_THRESHOLD)
        .map(|(score, _, word)| FuzzyMatch {
            word,
            score,
            exact: word.main.to_lowercase() == input.to_lowercase(),
        })
}
