#![allow(dead_code)]
//! Word packs: canonical words, their matchers, and per-language lookup
//!
//! Pack data is forgiving. Entries may be bare strings, `{ main }` objects
//! or `{ main, matchers }` objects, and all of them are coerced into the
//! single normalized [`Word`] shape at load time. The rest of the engine
//! only ever sees normalized words.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Language code used when a pack is given as a flat word list
pub const DEFAULT_LANGUAGE: &str = "en";

/// Description used when a pack does not provide one
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

/// Errors raised while selecting words out of a pack
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("pack {pack} does not have a word list for language {language}")]
    MissingLanguage { pack: String, language: String },
}

/// Serialized form of a matcher: regex source text plus case flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub source: String,
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
}

fn default_case_insensitive() -> bool {
    true
}

/// An equivalent-spelling matcher for a word.
///
/// Two patterns are equal when their source text and case flag are equal,
/// regardless of how the regex compiled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PatternSpec", into = "PatternSpec")]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
    /// Unanchored regex (`None` only if even the escaped source failed)
    regex: Option<Regex>,
    /// Regex anchored to the whole input
    whole: Option<Regex>,
}

impl Pattern {
    /// Build a pattern from regex source. Invalid sources are coerced into
    /// a literal match of the same text rather than rejected.
    pub fn new(source: impl Into<String>, case_insensitive: bool) -> Self {
        let source = source.into();
        match compile(&source, case_insensitive) {
            Ok((regex, whole)) => Self {
                source,
                case_insensitive,
                regex: Some(regex),
                whole: Some(whole),
            },
            Err(err) => {
                warn!(%source, %err, "invalid matcher pattern, treating it as literal text");
                let escaped = regex::escape(&source);
                let compiled = compile(&escaped, case_insensitive).ok();
                Self {
                    source: escaped,
                    case_insensitive,
                    regex: compiled.as_ref().map(|(r, _)| r.clone()),
                    whole: compiled.map(|(_, w)| w),
                }
            }
        }
    }

    /// Case-insensitive pattern matching `text` literally.
    pub fn identity(text: &str) -> Self {
        Self::new(regex::escape(text), true)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// True if the pattern matches anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }

    /// True if the pattern matches all of `text`
    pub fn matches_whole(&self, text: &str) -> bool {
        self.whole.as_ref().is_some_and(|r| r.is_match(text))
    }

    /// The source with escape backslashes removed, for approximate matching.
    pub fn literal_text(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut chars = self.source.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn compile(source: &str, case_insensitive: bool) -> Result<(Regex, Regex), regex::Error> {
    let regex = RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()?;
    let whole = RegexBuilder::new(&format!("^(?:{})$", source))
        .case_insensitive(case_insensitive)
        .build()?;
    Ok((regex, whole))
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.case_insensitive == other.case_insensitive
    }
}

impl Eq for Pattern {}

impl From<PatternSpec> for Pattern {
    fn from(spec: PatternSpec) -> Self {
        Pattern::new(spec.source, spec.case_insensitive)
    }
}

impl From<Pattern> for PatternSpec {
    fn from(pattern: Pattern) -> Self {
        PatternSpec {
            source: pattern.source,
            case_insensitive: pattern.case_insensitive,
        }
    }
}

/// A canonical word and every pattern that counts as spelling it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub main: String,
    /// Never empty once normalized; always holds the identity pattern.
    pub matchers: Vec<Pattern>,
}

impl Word {
    /// Uppercased first character of the canonical spelling
    pub fn initial(&self) -> Option<char> {
        self.main.chars().next().map(to_upper)
    }

    /// Case-insensitive check on the first character
    pub fn starts_with_letter(&self, letter: char) -> bool {
        starts_with_letter(&self.main, letter)
    }
}

/// A word as it appears in pack data, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawWord {
    Bare(String),
    WithMatchers {
        main: String,
        matchers: Vec<PatternSpec>,
    },
    Main {
        main: String,
    },
}

impl From<&str> for RawWord {
    fn from(main: &str) -> Self {
        RawWord::Bare(main.to_string())
    }
}

impl RawWord {
    /// Word with extra matcher sources, all case-insensitive
    pub fn with_matchers(main: &str, sources: &[&str]) -> Self {
        RawWord::WithMatchers {
            main: main.to_string(),
            matchers: sources
                .iter()
                .map(|s| PatternSpec {
                    source: (*s).to_string(),
                    case_insensitive: true,
                })
                .collect(),
        }
    }
}

/// Coerce raw entries into normalized words.
///
/// The identity pattern for `main` is appended unless an equal pattern is
/// already among the supplied matchers.
pub fn normalize<I, W>(raw: I) -> Vec<Word>
where
    I: IntoIterator<Item = W>,
    W: Into<RawWord>,
{
    raw.into_iter().map(|w| to_word(w.into())).collect()
}

fn to_word(raw: RawWord) -> Word {
    let (main, mut matchers) = match raw {
        RawWord::Bare(main) | RawWord::Main { main } => (main, Vec::new()),
        RawWord::WithMatchers { main, matchers } => {
            (main, matchers.into_iter().map(Pattern::from).collect())
        }
    };
    let identity = Pattern::identity(&main);
    if !matchers.contains(&identity) {
        matchers.push(identity);
    }
    Word { main, matchers }
}

/// Raw word lists, either flat or grouped by language
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawWords {
    Flat(Vec<RawWord>),
    ByLanguage(BTreeMap<String, Vec<RawWord>>),
}

/// Pack as it is written in a JSON pack file
#[derive(Debug, Clone, Deserialize)]
pub struct RawPack {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "category")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub default_language: Option<String>,
    pub words: RawWords,
}

/// A named collection of candidate words grouped by language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPack {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
    words: BTreeMap<String, Vec<Word>>,
}

impl WordPack {
    /// Build a pack, normalizing every word list.
    ///
    /// Flat lists land under `default_language` (or [`DEFAULT_LANGUAGE`]).
    /// Languages whose list is empty are dropped.
    pub fn from_raw(raw: RawPack) -> Self {
        let default_language = raw
            .default_language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let grouped = match raw.words {
            RawWords::Flat(words) => BTreeMap::from([(default_language, words)]),
            RawWords::ByLanguage(map) => map,
        };
        let words = grouped
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(language, list)| (language, normalize(list)))
            .collect();

        Self {
            name: raw.name,
            description: raw
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            categories: raw.categories,
            words,
        }
    }

    /// Parse a pack from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawPack>(json).map(Self::from_raw)
    }

    /// Word list for a language
    pub fn lookup(&self, language: &str) -> Result<&[Word], PackError> {
        self.words
            .get(language)
            .map(Vec::as_slice)
            .ok_or_else(|| PackError::MissingLanguage {
                pack: self.name.clone(),
                language: language.to_string(),
            })
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.words.contains_key(language)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Languages this pack has words for, in code order
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }
}

/// Uppercase a single character, keeping it as one char
pub fn to_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

/// Case-insensitive comparison of two letters
pub fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive check that `text` begins with `letter`
pub fn starts_with_letter(text: &str, letter: char) -> bool {
    text.chars().next().is_some_and(|c| same_letter(c, letter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_pack(words: RawWords) -> RawPack {
        RawPack {
            name: "Test".to_string(),
            description: None,
            categories: vec!["Science".to_string()],
            default_language: None,
            words,
        }
    }

    #[test]
    fn test_bare_word_gets_identity_matcher() {
        let words = normalize(["Cat"]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].main, "Cat");
        assert_eq!(words[0].matchers, vec![Pattern::identity("Cat")]);
    }

    #[test]
    fn test_identity_matcher_is_case_insensitive() {
        let words = normalize(["Cat", "U.S. Virgin Islands", "C++ (language)"]);
        for word in &words {
            assert!(
                word.matchers.iter().any(|m| m.is_match(&word.main.to_uppercase())),
                "no matcher for {}",
                word.main
            );
            assert!(word.matchers.iter().any(|m| m.matches_whole(&word.main.to_lowercase())));
        }
    }

    #[test]
    fn test_identity_not_duplicated() {
        let raw = RawWord::WithMatchers {
            main: "Leo".to_string(),
            matchers: vec![PatternSpec {
                source: "Leo".to_string(),
                case_insensitive: true,
            }],
        };
        let words = normalize([raw]);
        assert_eq!(words[0].matchers.len(), 1);
    }

    #[test]
    fn test_extra_matchers_kept_before_identity() {
        let words = normalize([RawWord::with_matchers("Qoç", &["qoch?"])]);
        let sources: Vec<&str> = words[0].matchers.iter().map(|m| m.source()).collect();
        assert_eq!(sources, vec!["qoch?", "Qoç"]);
        assert!(words[0].matchers[0].matches_whole("QOCH"));
    }

    #[test]
    fn test_different_case_flag_is_a_different_pattern() {
        let raw = RawWord::WithMatchers {
            main: "Leo".to_string(),
            matchers: vec![PatternSpec {
                source: "Leo".to_string(),
                case_insensitive: false,
            }],
        };
        let words = normalize([raw]);
        assert_eq!(words[0].matchers.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_coerced_to_literal() {
        let pattern = Pattern::new("(unclosed", true);
        assert_eq!(pattern.source(), r"\(unclosed");
        assert!(pattern.matches_whole("(UNCLOSED"));
        assert_eq!(pattern.literal_text(), "(unclosed");
    }

    #[test]
    fn test_raw_words_from_json_shapes() {
        let json = r#"{
            "name": "Mixed",
            "words": { "en": ["Cat", { "main": "Car" }, { "main": "Cow", "matchers": [{ "source": "kow" }] }] }
        }"#;
        let pack = WordPack::from_json(json).unwrap();
        let words = pack.lookup("en").unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[1].main, "Car");
        assert_eq!(words[2].matchers.len(), 2);
        assert_eq!(pack.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_flat_list_lands_in_default_language() {
        let pack = WordPack::from_raw(raw_pack(RawWords::Flat(vec!["Iron".into()])));
        assert!(pack.has_language(DEFAULT_LANGUAGE));
        assert_eq!(pack.languages().collect::<Vec<_>>(), vec!["en"]);
    }

    #[test]
    fn test_empty_language_list_dropped() {
        let mut map = BTreeMap::new();
        map.insert("en".to_string(), vec!["Iron".into()]);
        map.insert("ru".to_string(), Vec::new());
        let pack = WordPack::from_raw(raw_pack(RawWords::ByLanguage(map)));
        assert!(!pack.has_language("ru"));
    }

    #[test]
    fn test_lookup_missing_language() {
        let pack = WordPack::from_raw(raw_pack(RawWords::Flat(vec!["Iron".into()])));
        assert_eq!(
            pack.lookup("az"),
            Err(PackError::MissingLanguage {
                pack: "Test".to_string(),
                language: "az".to_string()
            })
        );
        assert!(pack.has_category("Science"));
    }

    #[test]
    fn test_duplicates_are_not_deduplicated() {
        let words = normalize(["Cat", "Cat"]);
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_letter_helpers() {
        assert!(starts_with_letter("cat", 'C'));
        assert!(starts_with_letter("Əkizlər", 'ə'));
        assert!(!starts_with_letter("", 'C'));
        assert_eq!(to_upper('ş'), 'Ş');
    }
}
