//! Application state and core logic

pub mod screen;
pub mod state;

pub use screen::{Screen, SetupItem};
pub use state::{App, Feedback, Tone};
