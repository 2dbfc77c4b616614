use super::cards::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the set of active packs is chosen
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SelectionMode {
    /// Only the first pack of the catalog
    Default,
    Official,
    /// Every English pack
    AllByLanguage,
    ByLanguage(Language),
    /// This many English packs, chosen at random
    Random(i32),
    /// Explicit catalog indices
    Custom(BTreeSet<usize>),
}

impl SelectionMode {
    pub fn tag(&self) -> PackSelectionMode {
        match self {
            SelectionMode::Default => PackSelectionMode::Default,
            SelectionMode::Official => PackSelectionMode::Official,
            SelectionMode::AllByLanguage => PackSelectionMode::All,
            SelectionMode::ByLanguage(Language::Czech) => PackSelectionMode::Czech,
            SelectionMode::ByLanguage(Language::Italian) => PackSelectionMode::Italian,
            SelectionMode::ByLanguage(Language::Catalan) => PackSelectionMode::Catalan,
            SelectionMode::Random(_) => PackSelectionMode::Random,
            SelectionMode::Custom(_) => PackSelectionMode::Custom,
        }
    }
}

/// The persisted form of a [SelectionMode]. The random amount and custom indices live next to it
/// in the preferences document.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackSelectionMode {
    Default,
    Official,
    All,
    Czech,
    Italian,
    Catalan,
    Random,
    Custom,
}

impl PackSelectionMode {
    pub const ALL: [PackSelectionMode; 8] = [
        PackSelectionMode::Default,
        PackSelectionMode::Official,
        PackSelectionMode::All,
        PackSelectionMode::Czech,
        PackSelectionMode::Italian,
        PackSelectionMode::Catalan,
        PackSelectionMode::Random,
        PackSelectionMode::Custom,
    ];

    /// The language a mode is gated behind, if any
    pub fn language(self) -> Option<Language> {
        match self {
            PackSelectionMode::Czech => Some(Language::Czech),
            PackSelectionMode::Italian => Some(Language::Italian),
            PackSelectionMode::Catalan => Some(Language::Catalan),
            _ => None,
        }
    }
}

impl Default for PackSelectionMode {
    fn default() -> Self {
        PackSelectionMode::Default
    }
}
