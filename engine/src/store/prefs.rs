use common::documents::{FeatureFlags, Preferences};
use log::warn;

use super::{
    document::{load_document, save_document, DocumentStore},
    FLAGS_KEY,
    PREFERENCES_KEY,
};
use crate::error::{GameError, Result};

/// Reads the stored preferences. Missing or unreadable preferences fall back to the defaults.
pub async fn load_preferences(store: &dyn DocumentStore) -> Preferences {
    load_or_default(store, PREFERENCES_KEY).await
}

pub async fn save_preferences(store: &dyn DocumentStore, preferences: &Preferences) -> Result<()> {
    save_document(store, PREFERENCES_KEY, preferences)
        .await
        .map_err(|e| GameError::write_failed(PREFERENCES_KEY, e))
}

/// Reads the stored feature flags, all off if there are none
pub async fn load_flags(store: &dyn DocumentStore) -> FeatureFlags {
    load_or_default(store, FLAGS_KEY).await
}

pub async fn save_flags(store: &dyn DocumentStore, flags: &FeatureFlags) -> Result<()> {
    save_document(store, FLAGS_KEY, flags)
        .await
        .map_err(|e| GameError::write_failed(FLAGS_KEY, e))
}

async fn load_or_default<D>(store: &dyn DocumentStore, key: &str) -> D
where D: serde::de::DeserializeOwned + Default {
    match load_document(store, key).await {
        Ok(Some(document)) => document,
        Ok(None) => D::default(),
        Err(e) => {
            warn!("Ignoring stored {}: {:#}", key, e);
            D::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use common::data::{cards::Language, selection::PackSelectionMode};

    #[tokio::test]
    async fn defaults_when_absent_or_corrupt() {
        let store = MemoryStore::new();
        assert_eq!(load_preferences(&store).await, Preferences::default());

        store
            .write(PREFERENCES_KEY, b"{\"packSelectionMode\": 12".to_vec())
            .await
            .unwrap();
        assert_eq!(load_preferences(&store).await, Preferences::default());
        assert_eq!(load_flags(&store).await, FeatureFlags::default());
    }

    #[tokio::test]
    async fn round_trip() {
        let store = MemoryStore::new();

        let mut prefs = Preferences::default();
        prefs.pack_selection_mode = PackSelectionMode::Custom;
        prefs.selected_pack_indices = vec![3, 1];
        save_preferences(&store, &prefs).await.unwrap();
        assert_eq!(load_preferences(&store).await, prefs);

        let mut flags = FeatureFlags::default();
        flags.set(Language::Catalan, true);
        save_flags(&store, &flags).await.unwrap();
        assert!(load_flags(&store).await.is_enabled(Language::Catalan));
    }

    #[tokio::test]
    async fn write_failures_are_reported() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        match save_preferences(&store, &Preferences::default()).await {
            Err(GameError::StoreWriteFailed { key, .. }) => assert_eq!(key, PREFERENCES_KEY),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
