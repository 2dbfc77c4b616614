use crate::data::{cards::Language, selection::PackSelectionMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which optional language packs the player has turned on, keyed by language name
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, Debug)]
#[serde(transparent)]
pub struct FeatureFlags {
    flags: BTreeMap<String, bool>,
}

impl FeatureFlags {
    pub fn is_enabled(&self, language: Language) -> bool {
        self.flags.get(language.name()).copied().unwrap_or(false)
    }

    pub fn set(&mut self, language: Language, enabled: bool) {
        self.flags.insert(language.name().to_owned(), enabled);
    }

    /// Selection modes that may be offered given these flags
    pub fn available_modes(&self) -> Vec<PackSelectionMode> {
        PackSelectionMode::ALL
            .iter()
            .copied()
            .filter(|mode| mode.language().map_or(true, |lang| self.is_enabled(lang)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_modes_need_their_flag() {
        let mut flags = FeatureFlags::default();
        assert_eq!(flags.available_modes().len(), 5);
        assert!(!flags.available_modes().contains(&PackSelectionMode::Czech));

        flags.set(Language::Czech, true);
        let modes = flags.available_modes();
        assert!(modes.contains(&PackSelectionMode::Czech));
        assert!(!modes.contains(&PackSelectionMode::Italian));
    }

    #[test]
    fn stored_as_a_plain_map() {
        let flags: FeatureFlags = serde_json::from_str(r#"{"Italian":true,"dark":false}"#).unwrap();
        assert!(flags.is_enabled(Language::Italian));
        assert!(!flags.is_enabled(Language::Catalan));
    }
}
