//! Game rules: packs, word validation, turns, eliminations, time budget
//!
//! ```text
//! submit ──▶ validation ──▶ engine.apply_successful_word ──▶ turn::next_turn
//!                                   │
//!                                   └──▶ resolver::classify
//! timer ran out / leave ──▶ engine.apply_elimination ──▶ resolver::classify
//!                                   │
//!                                   └──▶ turn::next_player_after_elimination
//! ```

pub mod budget;
pub mod engine;
pub mod fuzzy;
pub mod pack;
pub mod packs;
pub mod resolver;
pub mod roster;
pub mod session;
pub mod turn;
pub mod validation;

pub use budget::{compute_start_seconds, Speed, TimeBudget};
pub use engine::{Accepted, EngineError, GameSnapshot, GameState, SubmitError};
pub use pack::{normalize, PackError, Pattern, RawWord, Word, WordPack};
pub use resolver::{classify, Classification};
pub use roster::{Player, Roster};
pub use session::GameSession;
pub use validation::{validate, Rejection};
