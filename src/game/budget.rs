//! Per-turn time budget

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game speed setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    pub fn all() -> &'static [Speed] {
        &[Speed::Slow, Speed::Medium, Speed::Fast]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::all()
            .iter()
            .copied()
            .find(|speed| speed.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown speed '{}', expected slow, medium or fast", s))
    }
}

/// Constants for the time budget formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBudget {
    pub base_slow: u32,
    pub base_medium: u32,
    pub base_fast: u32,
    /// Bonus seconds when the pack is almost exhausted
    pub bonus_at_low_words: f64,
    /// Remaining word count at which half the bonus applies
    pub remaining_half: f64,
    pub round_penalty_per_round: u32,
    /// Most rounds that count toward the penalty
    pub round_penalty_cap: u32,
    pub min_seconds: u32,
    /// When set, every turn gets exactly this many seconds
    pub fixed_override: Option<u32>,
}

impl Default for TimeBudget {
    fn default() -> Self {
        Self {
            base_slow: 90,
            base_medium: 60,
            base_fast: 45,
            bonus_at_low_words: 45.0,
            remaining_half: 20.0,
            round_penalty_per_round: 2,
            round_penalty_cap: 10,
            min_seconds: 15,
            fixed_override: None,
        }
    }
}

impl TimeBudget {
    pub fn base(&self, speed: Speed) -> u32 {
        match speed {
            Speed::Slow => self.base_slow,
            Speed::Medium => self.base_medium,
            Speed::Fast => self.base_fast,
        }
    }

    /// Starting seconds for the next turn.
    ///
    /// Fewer remaining words earn a larger bonus; every round after the
    /// first costs a fixed penalty, up to the cap. Never below the floor,
    /// and never below one second so a turn can always be played.
    pub fn start_seconds(&self, remaining_words: usize, round: u32, speed: Speed) -> u32 {
        if let Some(fixed) = self.fixed_override {
            return fixed.max(1);
        }

        let round = round.max(1);
        let base = f64::from(self.base(speed));
        let half = self.remaining_half;
        let bonus = if half + remaining_words as f64 > 0.0 {
            self.bonus_at_low_words * (half / (remaining_words as f64 + half))
        } else {
            0.0
        };

        let penalty_rounds = (round - 1).min(self.round_penalty_cap);
        let penalty = f64::from(penalty_rounds.saturating_mul(self.round_penalty_per_round));

        let seconds = (base + bonus - penalty).round().max(0.0) as u32;
        seconds.max(self.min_seconds).max(1)
    }
}

/// Starting seconds for the next turn under `budget`
pub fn compute_start_seconds(
    remaining_words: usize,
    round: u32,
    speed: Speed,
    budget: &TimeBudget,
) -> u32 {
    budget.start_seconds(remaining_words, round, speed)
}
