use anyhow::{anyhow, Context};
use async_trait::async_trait;
use common::documents::{decode, encode};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};
use tokio::fs;

/// Somewhere to keep small documents between sessions
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` if nothing was ever written under `key`
    async fn read(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    async fn write(&self, key: &str, document: Vec<u8>) -> anyhow::Result<()>;
}

pub async fn load_document<D>(store: &dyn DocumentStore, key: &str) -> anyhow::Result<Option<D>>
where D: DeserializeOwned {
    match store.read(key).await? {
        Some(bytes) => decode(&bytes)
            .with_context(|| format!("Error deserializing {}", key))
            .map(Some),
        None => Ok(None),
    }
}

pub async fn save_document<D>(store: &dyn DocumentStore, key: &str, document: &D) -> anyhow::Result<()>
where D: Serialize + ?Sized {
    let bytes = encode(document).with_context(|| format!("Error serializing {}", key))?;
    store.write(key, bytes).await
}

/// Keeps each document as `<key>.json` in a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        FileStore {
            dir: dir.as_ref().to_owned(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Error reading {}", path.display())),
        }
    }

    async fn write(&self, key: &str, document: Vec<u8>) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Error creating {}", self.dir.display()))?;

        // Write next to the target and swap it in so readers never see half a document
        let path = self.path(key);
        let staging = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&staging, document)
            .await
            .with_context(|| format!("Error writing {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("Error replacing {}", path.display()))
    }
}

/// Keeps documents in memory. Writes can be made to fail to exercise error handling.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(documents.get(key).cloned())
    }

    async fn write(&self, key: &str, document: Vec<u8>) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("Writes to {} are disabled", key));
        }

        self.documents
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?
            .insert(key.to_owned(), document);
        Ok(())
    }
}
