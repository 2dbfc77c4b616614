//! The documents the game keeps in local storage.

pub mod flags;
pub mod preferences;
pub mod saved;

pub use flags::FeatureFlags;
pub use preferences::Preferences;
pub use saved::SavedPlay;

use serde::{Deserialize, Serialize};

pub fn encode<D: Serialize + ?Sized>(document: &D) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(document)
}

pub fn decode<'de, D: Deserialize<'de>>(data: &'de [u8]) -> Result<D, serde_json::Error> {
    serde_json::from_slice(data)
}
