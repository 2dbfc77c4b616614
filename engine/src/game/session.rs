use common::{
    data::{
        cards::{Language, PackId, PromptCard, ResponseCard},
        selection::{PackSelectionMode, SelectionMode},
        vec_set::VecSet,
    },
    documents::{FeatureFlags, Preferences, SavedPlay},
    text::{RenderOptions, Rendered},
};
use log::{debug, error, info};
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::watch;

use super::{packs::resolve, round::RoundState};
use crate::{
    config::EngineConfig,
    data::{Catalog, PackStore},
    error::{GameError, Result},
    store::{
        open_saved_plays,
        prefs::{load_flags, load_preferences, save_flags, save_preferences},
        DocumentStore,
        FileStore,
        SavedPlayHandle,
    },
};

/// What the session looked like right after a transition
#[derive(Clone, Default, Debug)]
pub struct Snapshot {
    pub active_packs: BTreeSet<PackId>,
    pub hand: Vec<ResponseCard>,
    pub current_prompt: Option<PromptCard>,
    pub selected: VecSet<ResponseCard>,
    pub rounds_completed: u32,
    pub is_saved: bool,
    pub can_advance: bool,
    pub rendered_prompt: Rendered,
    pub saved_plays: Vec<SavedPlay>,
    pub preferences: Preferences,
    pub available_modes: Vec<PackSelectionMode>,
}

/// A single player's game. Transitions are synchronous and publish a new [Snapshot] before
/// returning; anything that touches storage is async.
pub struct Session {
    catalog: Arc<Catalog>,
    round: RoundState,
    store: Arc<dyn DocumentStore>,
    saved: SavedPlayHandle,
    saved_plays: Vec<SavedPlay>,
    preferences: Preferences,
    flags: FeatureFlags,
    render_options: RenderOptions,
    snapshots: watch::Sender<Arc<Snapshot>>,
}

impl Session {
    /// Loads the catalog from `config.catalog_path` and keeps documents under `config.data_dir`
    pub async fn open(config: &EngineConfig) -> Result<Self> {
        let catalog = PackStore::new(&config.catalog_path).load().await?;
        let store = Arc::new(FileStore::new(&config.data_dir));
        Self::start(catalog, store, config).await
    }

    pub async fn start(
        catalog: Arc<Catalog>,
        store: Arc<dyn DocumentStore>,
        config: &EngineConfig,
    ) -> Result<Self> {
        Self::start_with(catalog, store, config, RoundState::new(config.hand_size)).await
    }

    /// Like [Session::start] but every draw is reproducible
    pub async fn start_seeded(
        catalog: Arc<Catalog>,
        store: Arc<dyn DocumentStore>,
        config: &EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        let round = RoundState::with_seed(seed, config.hand_size);
        Self::start_with(catalog, store, config, round).await
    }

    async fn start_with(
        catalog: Arc<Catalog>,
        store: Arc<dyn DocumentStore>,
        config: &EngineConfig,
        mut round: RoundState,
    ) -> Result<Self> {
        let saved = open_saved_plays(Arc::clone(&store));
        let (preferences, flags, saved_plays) = futures::join!(
            load_preferences(&*store),
            load_flags(&*store),
            saved.load()
        );
        let saved_plays = saved_plays?;

        let mode = preferences.selection_mode();
        let pack_ids = resolve(&mode, catalog.packs(), round.rng());
        round.activate_packs(&catalog, &pack_ids)?;
        info!(
            "Session started with {:?} ({} packs, {} saved plays)",
            preferences.pack_selection_mode,
            round.active_packs().len(),
            saved_plays.len()
        );

        let (snapshots, _) = watch::channel(Arc::new(Snapshot::default()));
        let session = Session {
            catalog,
            round,
            store,
            saved,
            saved_plays,
            preferences,
            flags,
            render_options: config.render,
            snapshots,
        };
        session.publish();
        Ok(session)
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn saved_plays(&self) -> &[SavedPlay] {
        &self.saved_plays
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    pub fn render_options(&self) -> RenderOptions {
        self.render_options
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshots.subscribe()
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    pub fn select(&mut self, card: &ResponseCard) -> bool {
        let changed = self.round.select(card);
        if changed {
            self.publish();
        }
        changed
    }

    pub fn unselect(&mut self, card: &ResponseCard) -> bool {
        let changed = self.round.unselect(card);
        if changed {
            self.publish();
        }
        changed
    }

    pub fn reshuffle_hand(&mut self) {
        self.round.reshuffle_hand();
        self.publish();
    }

    pub fn advance_round(&mut self) -> Result<()> {
        self.round.advance_round()?;
        self.publish();
        Ok(())
    }

    /// Records the current prompt and selection as a saved play. The selection has to be
    /// complete. The write happens in the background, see [Session::flush].
    pub fn save(&mut self) -> Result<()> {
        if self.round.is_saved() {
            return Ok(());
        }

        let play = match self.round.current_play() {
            Some(play) if self.round.can_advance() => play,
            _ =>
                return Err(GameError::NotReady {
                    selected: self.round.selected().len(),
                    pick: self.round.pick(),
                }),
        };

        self.round.set_saved(true);
        if !self.saved_plays.contains(&play) {
            self.saved_plays.push(play.clone());
        }
        self.saved.add(play);
        self.publish();
        Ok(())
    }

    pub fn unsave(&mut self) {
        if !self.round.is_saved() {
            return;
        }

        self.round.set_saved(false);
        if let Some(play) = self.round.current_play() {
            self.saved_plays.retain(|saved| saved != &play);
            self.saved.remove(play);
        }
        self.publish();
    }

    pub fn toggle_saved(&mut self) -> Result<()> {
        if self.round.is_saved() {
            self.unsave();
            Ok(())
        } else {
            self.save()
        }
    }

    /// Deletes a play from the saved list. Returns whether it was there.
    pub fn remove_saved(&mut self, play: &SavedPlay) -> bool {
        let before = self.saved_plays.len();
        self.saved_plays.retain(|saved| saved != play);
        if self.saved_plays.len() == before {
            return false;
        }

        if self.round.is_saved() && self.round.current_play().as_ref() == Some(play) {
            self.round.set_saved(false);
        }
        self.saved.remove(play.clone());
        self.publish();
        true
    }

    /// Puts the packs chosen by `mode` in play, deals a new round and remembers the choice. The
    /// round changes even if the preferences can't be written.
    pub async fn change_selection(&mut self, mode: SelectionMode) -> Result<()> {
        let pack_ids = resolve(&mode, self.catalog.packs(), self.round.rng());
        self.round.activate_packs(&self.catalog, &pack_ids)?;
        self.preferences.apply(&mode);
        debug!("Selected {:?}, packs {:?}", mode, pack_ids);
        self.publish();

        self.persist_preferences().await
    }

    /// Sets how many packs random selection draws. Redraws if random selection is active.
    pub async fn set_random_amount(&mut self, amount: i32) -> Result<()> {
        if self.preferences.pack_selection_mode == PackSelectionMode::Random {
            return self.change_selection(SelectionMode::Random(amount)).await;
        }

        self.preferences.random_amount = amount;
        self.publish();
        self.persist_preferences().await
    }

    /// Sets the packs custom selection uses. Applied right away if custom selection is active.
    pub async fn set_custom_indices(&mut self, indices: BTreeSet<usize>) -> Result<()> {
        if self.preferences.pack_selection_mode == PackSelectionMode::Custom {
            return self.change_selection(SelectionMode::Custom(indices)).await;
        }

        self.preferences.selected_pack_indices = indices.into_iter().collect();
        self.publish();
        self.persist_preferences().await
    }

    pub async fn set_flag(&mut self, language: Language, enabled: bool) -> Result<()> {
        self.flags.set(language, enabled);
        self.publish();

        save_flags(&*self.store, &self.flags).await.map_err(|e| {
            error!("{}", e);
            e
        })
    }

    /// Selection modes that can be offered with the current flags
    pub fn available_modes(&self) -> Vec<PackSelectionMode> {
        self.flags.available_modes()
    }

    /// Waits for queued saved play writes, returning the first one that failed since last time
    pub async fn flush(&self) -> Result<()> {
        self.saved.flush().await
    }

    async fn persist_preferences(&self) -> Result<()> {
        save_preferences(&*self.store, &self.preferences)
            .await
            .map_err(|e| {
                error!("{}", e);
                e
            })
    }

    fn publish(&self) {
        let round = &self.round;
        let snapshot = Snapshot {
            active_packs: round.active_packs().clone(),
            hand: round.hand().to_vec(),
            current_prompt: round.current_prompt().cloned(),
            selected: round.selected().clone(),
            rounds_completed: round.rounds_completed(),
            is_saved: round.is_saved(),
            can_advance: round.can_advance(),
            rendered_prompt: round.rendered_prompt(self.render_options),
            saved_plays: self.saved_plays.clone(),
            preferences: self.preferences.clone(),
            available_modes: self.available_modes(),
        };
        self.snapshots.send_replace(Arc::new(snapshot));
    }
}
