use common::documents::SavedPlay;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::task;

use super::{AddPlay, Flush, LoadPlays, RemovePlay, SavedPlayMessage};
use crate::{
    chan::{channel, Rx, Tx},
    error::{GameError, Result},
    store::{
        document::{load_document, save_document, DocumentStore},
        SAVED_PLAYS_KEY,
    },
};

/// Spawns the task that owns the saved play list. Every write to the list goes through it, so
/// writes land in the order they were posted.
pub fn open_saved_plays(store: Arc<dyn DocumentStore>) -> SavedPlayHandle {
    let (tx, rx) = channel();
    task::spawn(handle_saved_plays(rx, store));
    SavedPlayHandle { tx }
}

async fn handle_saved_plays(mut rx: Rx<SavedPlayMessage>, store: Arc<dyn DocumentStore>) {
    let mut saved = SavedPlays::new(store);

    while let Some(message) = rx.recv().await {
        saved.handle_message(message).await;
    }

    debug!("Saved play store shutting down");
}

#[derive(Clone)]
pub struct SavedPlayHandle {
    tx: Tx<SavedPlayMessage>,
}

impl SavedPlayHandle {
    pub async fn load(&self) -> Result<Vec<SavedPlay>> {
        self.tx.try_send(LoadPlays).await.unwrap_or(Err(GameError::StoreClosed))
    }

    pub fn add(&self, play: SavedPlay) {
        if !self.tx.post(AddPlay { play }) {
            error!("Saved play store is gone, dropping new play");
        }
    }

    pub fn remove(&self, play: SavedPlay) {
        if !self.tx.post(RemovePlay { play }) {
            error!("Saved play store is gone, dropping removal");
        }
    }

    pub async fn flush(&self) -> Result<()> {
        self.tx.try_send(Flush).await.unwrap_or(Err(GameError::StoreClosed))
    }
}

struct SavedPlays {
    store: Arc<dyn DocumentStore>,
    plays: Option<Vec<SavedPlay>>,
    write_error: Option<GameError>,
}

impl SavedPlays {
    fn new(store: Arc<dyn DocumentStore>) -> Self {
        SavedPlays {
            store,
            plays: None,
            write_error: None,
        }
    }

    async fn handle_message(&mut self, message: SavedPlayMessage) {
        match message {
            SavedPlayMessage::LoadPlays(LoadPlays, response) =>
                response.send(self.handle_load().await),
            SavedPlayMessage::Flush(Flush, response) => response.send(self.handle_flush()),
            SavedPlayMessage::AddPlay(AddPlay { play }) => self.handle_add(play).await,
            SavedPlayMessage::RemovePlay(RemovePlay { play }) => self.handle_remove(play).await,
        }
    }

    async fn handle_load(&mut self) -> Result<Vec<SavedPlay>> {
        Ok(self.loaded().await?.clone())
    }

    fn handle_flush(&mut self) -> Result<()> {
        match self.write_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn handle_add(&mut self, play: SavedPlay) {
        let plays = match self.loaded().await {
            Ok(plays) => plays,
            Err(e) => return self.record_failure(e),
        };

        if plays.contains(&play) {
            debug!("Play is already saved");
            return;
        }

        plays.push(play);
        self.persist().await;
    }

    async fn handle_remove(&mut self, play: SavedPlay) {
        let plays = match self.loaded().await {
            Ok(plays) => plays,
            Err(e) => return self.record_failure(e),
        };

        let before = plays.len();
        plays.retain(|saved| saved != &play);
        if plays.len() != before {
            self.persist().await;
        }
    }

    /// The list, read from the store the first time it's needed. An absent document starts an
    /// empty list and writes it out.
    async fn loaded(&mut self) -> Result<&mut Vec<SavedPlay>> {
        if self.plays.is_none() {
            let stored = load_document::<Vec<SavedPlay>>(&*self.store, SAVED_PLAYS_KEY)
                .await
                .map_err(|e| GameError::read_failed(SAVED_PLAYS_KEY, e))?;

            let plays = match stored {
                Some(plays) => {
                    info!("Loaded {} saved plays", plays.len());
                    plays
                }
                None => {
                    let plays = Vec::new();
                    if let Err(e) = save_document(&*self.store, SAVED_PLAYS_KEY, &plays).await {
                        self.record_failure(GameError::write_failed(SAVED_PLAYS_KEY, e));
                    }
                    plays
                }
            };

            self.plays = Some(plays);
        }

        Ok(self.plays.get_or_insert_with(Vec::new))
    }

    async fn persist(&mut self) {
        let plays = match &self.plays {
            Some(plays) => plays,
            None => return,
        };

        if let Err(e) = save_document(&*self.store, SAVED_PLAYS_KEY, plays).await {
            self.record_failure(GameError::write_failed(SAVED_PLAYS_KEY, e));
        }
    }

    fn record_failure(&mut self, e: GameError) {
        error!("{}", e);
        self.write_error.get_or_insert(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use common::{
        data::{
            cards::{PromptCard, ResponseCard},
            vec_set::VecSet,
        },
        documents::decode,
    };

    fn play(answer: &str) -> SavedPlay {
        let responses: VecSet<ResponseCard> =
            vec![ResponseCard::new(answer, 0)].into_iter().collect();
        SavedPlay::new(PromptCard::new("What's that smell? _", 1, 0), responses)
    }

    async fn stored(store: &MemoryStore) -> Vec<SavedPlay> {
        let bytes = store.read(SAVED_PLAYS_KEY).await.unwrap().unwrap();
        decode(&bytes).unwrap()
    }

    #[tokio::test]
    async fn absent_document_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        let handle = open_saved_plays(store.clone());

        assert_eq!(handle.load().await.unwrap(), Vec::new());
        assert_eq!(stored(&store).await, Vec::new());
    }

    #[tokio::test]
    async fn writes_are_ordered() {
        let store = Arc::new(MemoryStore::new());
        let handle = open_saved_plays(store.clone());

        handle.add(play("Socks."));
        handle.add(play("Glitter."));
        handle.add(play("Socks."));
        handle.remove(play("Glitter."));
        handle.flush().await.unwrap();

        assert_eq!(stored(&store).await, vec![play("Socks.")]);
        assert_eq!(handle.load().await.unwrap(), vec![play("Socks.")]);
    }

    #[tokio::test]
    async fn existing_plays_survive_reopen() {
        let store = Arc::new(MemoryStore::new());
        let first = open_saved_plays(store.clone());
        first.add(play("Socks."));
        first.flush().await.unwrap();

        let second = open_saved_plays(store.clone());
        assert_eq!(second.load().await.unwrap(), vec![play("Socks.")]);
    }

    #[tokio::test]
    async fn failed_writes_are_reported_once() {
        let store = Arc::new(MemoryStore::new());
        let handle = open_saved_plays(store.clone());
        handle.load().await.unwrap();

        store.set_fail_writes(true);
        handle.add(play("Socks."));
        assert!(matches!(
            handle.flush().await,
            Err(GameError::StoreWriteFailed { .. })
        ));
        assert_eq!(handle.flush().await, Ok(()));

        // The in-memory list keeps the play even though it never reached the store
        assert_eq!(handle.load().await.unwrap(), vec![play("Socks.")]);
    }

    #[tokio::test]
    async fn corrupt_document_fails_to_load() {
        let store = Arc::new(MemoryStore::new());
        store.write(SAVED_PLAYS_KEY, b"{".to_vec()).await.unwrap();

        let handle = open_saved_plays(store);
        assert!(matches!(
            handle.load().await,
            Err(GameError::StoreReadFailed { .. })
        ));
    }
}
