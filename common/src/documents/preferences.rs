use crate::data::{
    cards::Language,
    selection::{PackSelectionMode, SelectionMode},
};
use serde::{Deserialize, Serialize};

const DEFAULT_RANDOM_AMOUNT: i32 = 5;

/// Pack selection as the player last left it
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub pack_selection_mode: PackSelectionMode,
    pub selected_pack_indices: Vec<usize>,
    pub random_amount: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            pack_selection_mode: PackSelectionMode::Default,
            selected_pack_indices: vec![0],
            random_amount: DEFAULT_RANDOM_AMOUNT,
        }
    }
}

impl Preferences {
    /// Expands the stored tag into a mode the resolver understands
    pub fn selection_mode(&self) -> SelectionMode {
        match self.pack_selection_mode {
            PackSelectionMode::Default => SelectionMode::Default,
            PackSelectionMode::Official => SelectionMode::Official,
            PackSelectionMode::All => SelectionMode::AllByLanguage,
            PackSelectionMode::Czech => SelectionMode::ByLanguage(Language::Czech),
            PackSelectionMode::Italian => SelectionMode::ByLanguage(Language::Italian),
            PackSelectionMode::Catalan => SelectionMode::ByLanguage(Language::Catalan),
            PackSelectionMode::Random => SelectionMode::Random(self.random_amount),
            PackSelectionMode::Custom =>
                SelectionMode::Custom(self.selected_pack_indices.iter().copied().collect()),
        }
    }

    /// Records `mode`, keeping the random amount and custom indices it carries
    pub fn apply(&mut self, mode: &SelectionMode) {
        self.pack_selection_mode = mode.tag();
        match mode {
            SelectionMode::Random(amount) => self.random_amount = *amount,
            SelectionMode::Custom(indices) =>
                self.selected_pack_indices = indices.iter().copied().collect(),
            _ => {}
        }
    }
}
