use anyhow::Context;
use common::data::cards::PackPreview;
use log::info;
use std::{
    convert::AsRef,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::OnceCell};

use super::catalog::Catalog;
use crate::error::{GameError, Result};

/// Loads the card catalog from disk once and hands out shared references to it
pub struct PackStore {
    catalog_path: PathBuf,
    catalog: OnceCell<Arc<Catalog>>,
}

impl PackStore {
    pub fn new<P: AsRef<Path>>(catalog_path: P) -> Self {
        PackStore {
            catalog_path: catalog_path.as_ref().to_owned(),
            catalog: OnceCell::new(),
        }
    }

    /// Returns the catalog, reading and parsing it on first use. Concurrent callers wait for the
    /// same load. If the load is cancelled or fails nothing is cached and the next call retries.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        self.catalog
            .get_or_try_init(|| self.read_catalog())
            .await
            .map(Arc::clone)
    }

    /// The catalog if it has already been loaded
    pub fn loaded(&self) -> Option<Arc<Catalog>> {
        self.catalog.get().cloned()
    }

    pub async fn previews(&self) -> Result<Vec<PackPreview>> {
        Ok(self.load().await?.previews())
    }

    async fn read_catalog(&self) -> Result<Arc<Catalog>> {
        let document = fs::read(&self.catalog_path)
            .await
            .with_context(|| format!("Error reading {}", self.catalog_path.display()))
            .map_err(|e| GameError::MalformedCatalog(format!("{:#}", e)))?;

        let catalog = Catalog::from_document(&document)?;
        info!(
            "Loaded {} card packs from {}",
            catalog.len(),
            self.catalog_path.display()
        );
        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"[{"name": "CAH Base Set", "official": true,
        "white": [{"text": "Robots.", "pack": 0}],
        "black": [{"text": "_ ruined my life.", "pick": 1, "pack": 0}]}]"#;

    #[tokio::test]
    async fn loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let store = PackStore::new(&path);
        assert!(store.loaded().is_none());

        let first = store.load().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = store.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.previews().await.unwrap()[0].name, "CAH Base Set");
    }

    #[tokio::test]
    async fn missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.json");
        let store = PackStore::new(&path);

        assert!(matches!(
            store.load().await,
            Err(GameError::MalformedCatalog(_))
        ));

        std::fs::write(&path, DOCUMENT).unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
