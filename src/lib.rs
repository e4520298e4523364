//! Astro Gap - A side-scrolling gap runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, scoring ledger)
//! - `driver`: Frame driver, timers and the game lifecycle
//! - `snapshot`: Per-frame view handed to the renderer and scoreboard
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage backends
//! - `highscores`: Best-score load/save
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use driver::{FixedInterval, FrameClock, FrameDriver, Lifecycle};
pub use highscores::HighScoreStore;
pub use snapshot::{Scoreboard, Snapshot};
pub use tuning::{Tuning, TuningError};
