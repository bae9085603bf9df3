#![allow(dead_code)]
//! Built-in pack catalogue
//!
//! Packs are built once, on first use, from the word lists below.

use super::pack::{RawPack, RawWord, RawWords, WordPack};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A language a pack may provide words for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages known to the catalogue
pub const LANGUAGES: [Language; 3] = [
    Language { code: "en", name: "English" },
    Language { code: "az", name: "Azərbaycan dili" },
    Language { code: "ru", name: "Русский" },
];

/// Look up a language by code
pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

const ZODIAC_EN: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// Azerbaijani signs with the spellings people type on a latin keyboard
const ZODIAC_AZ: [(&str, &str); 12] = [
    ("Qoç", "qoch?"),
    ("Buğa", "bu(q|g)a"),
    ("Əkizlər", "(e|ə)kizl(e|ə)r"),
    ("Xərçəng", "x(e|ə)r(c|ç)h?(e|ə)ng"),
    ("Şir", "sh?ir"),
    ("Qız", "q(i|ı)z"),
    ("Tərəzi", "t(e|ə)r(e|ə)zi"),
    ("Əqrəb", "(e|ə)qr(e|ə)b"),
    ("Oxatan", "ox(a|ə)tan"),
    ("Oğlaq", "o(g|ğ|q)laq"),
    ("Dolça", "dol(c|ç)a"),
    ("Balıqlar", "bal(i|ı)qlar"),
];

const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

const IMDB_TOP: [&str; 3] = ["The Godfather", "The Godfather: Part Two", "The Dark Knight"];

fn pack(name: &str, description: &str, categories: &[&str], words: RawWords) -> WordPack {
    WordPack::from_raw(RawPack {
        name: name.to_string(),
        description: Some(description.to_string()),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        default_language: None,
        words,
    })
}

fn bare(words: &[&str]) -> Vec<RawWord> {
    words.iter().map(|w| RawWord::from(*w)).collect()
}

static CATALOGUE: Lazy<Vec<WordPack>> = Lazy::new(|| {
    let zodiac = BTreeMap::from([
        ("en".to_string(), bare(&ZODIAC_EN)),
        (
            "az".to_string(),
            ZODIAC_AZ
                .iter()
                .map(|&(main, alt)| RawWord::with_matchers(main, &[alt]))
                .collect(),
        ),
    ]);

    vec![
        pack(
            "US States",
            "The 50 states of the United States",
            &["Geography"],
            RawWords::Flat(bare(&US_STATES)),
        ),
        pack(
            "IMDB Top 250",
            "The list of the top 250 movies on IMDB",
            &["Entertainment", "Movies"],
            RawWords::Flat(bare(&IMDB_TOP)),
        ),
        pack(
            "Zodiac Signs",
            "The 12 zodiac signs, according to the Western zodiac",
            &["Culture", "Astrology"],
            RawWords::ByLanguage(zodiac),
        ),
    ]
});

/// Every built-in pack
pub fn all() -> &'static [WordPack] {
    &CATALOGUE
}

/// Find a built-in pack by name, ignoring case
pub fn find(name: &str) -> Option<&'static WordPack> {
    CATALOGUE.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Packs that have words for `language` and carry `category`
pub fn filter(language: Option<&str>, category: Option<&str>) -> Vec<&'static WordPack> {
    CATALOGUE
        .iter()
        .filter(|p| language.is_none_or(|l| p.has_language(l)))
        .filter(|p| category.is_none_or(|c| p.has_category(c)))
        .collect()
}
