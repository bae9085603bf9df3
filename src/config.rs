//! Game settings

use crate::game::budget::{Speed, TimeBudget};
use crate::game::pack::DEFAULT_LANGUAGE;
use crate::timer::{DEFAULT_RESOLUTION_MS, MIN_RESOLUTION_MS};
use serde::{Deserialize, Serialize};

/// Player-facing preferences plus the time budget constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed: Speed,
    /// When off, turns never time out
    pub has_timer: bool,
    pub show_used_words: bool,
    pub show_words_left: bool,
    pub sound_enabled: bool,
    pub tick_resolution_ms: u64,
    pub time_budget: TimeBudget,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            has_timer: true,
            show_used_words: true,
            show_words_left: true,
            sound_enabled: true,
            tick_resolution_ms: DEFAULT_RESOLUTION_MS,
            time_budget: TimeBudget::default(),
        }
    }
}

impl Settings {
    /// Polling interval for the countdown, never below the minimum
    pub fn tick_resolution_ms(&self) -> u64 {
        self.tick_resolution_ms.max(MIN_RESOLUTION_MS)
    }

    /// Starting seconds for a turn under these settings
    pub fn start_seconds(&self, remaining_words: usize, round: u32) -> u32 {
        self.time_budget
            .start_seconds(remaining_words, round, self.speed)
    }
}

/// Name of the chosen pack and the language to play it in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSelection {
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl PackSelection {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.speed, Speed::Medium);
        assert!(settings.has_timer);
        assert_eq!(settings.tick_resolution_ms(), 250);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "speed": "fast", "time_budget": { "fixed_override": 5 } }"#)
                .unwrap();
        assert_eq!(settings.speed, Speed::Fast);
        assert!(settings.show_used_words);
        assert_eq!(settings.time_budget.base_fast, 45);
        assert_eq!(settings.start_seconds(10, 3), 5);
    }

    #[test]
    fn test_pack_selection_language_defaults() {
        let selection: PackSelection = serde_json::from_str(r#"{ "name": "US States" }"#).unwrap();
        assert_eq!(selection, PackSelection::new("US States", "en"));
    }

    #[test]
    fn test_resolution_floor() {
        let settings = Settings {
            tick_resolution_ms: 1,
            ..Settings::default()
        };
        assert_eq!(settings.tick_resolution_ms(), MIN_RESOLUTION_MS);
    }
}
