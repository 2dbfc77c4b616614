pub mod document;
pub mod prefs;
pub mod saved;

pub use document::{DocumentStore, FileStore, MemoryStore};
pub use saved::{open_saved_plays, SavedPlayHandle};

/// Document holding the list of saved plays
pub const SAVED_PLAYS_KEY: &str = "jokes";
/// Document holding the pack selection [Preferences](common::documents::Preferences)
pub const PREFERENCES_KEY: &str = "store";
pub const FLAGS_KEY: &str = "flags";
