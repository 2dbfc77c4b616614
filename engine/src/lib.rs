//! Game state for a party card game: the card catalog, pack selection, rounds, and the plays a
//! player keeps.

pub mod chan;
pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod logging;
pub mod store;

pub use config::EngineConfig;
pub use error::{GameError, Result};
pub use game::{RoundState, Session, Snapshot};
