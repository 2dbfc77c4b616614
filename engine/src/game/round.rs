use common::{
    data::{
        cards::{PackId, PromptCard, ResponseCard},
        vec_set::VecSet,
    },
    documents::SavedPlay,
    text::{render, RenderOptions, Rendered},
};
use log::{debug, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::{BTreeSet, HashSet};

use crate::{
    data::catalog::{dedup, Catalog},
    error::{GameError, Result},
};

pub const DEFAULT_HAND_SIZE: usize = 10;

/// The cards in play, the player's hand and what they've picked for the current prompt.
///
/// Starts out empty; [activate_packs](RoundState::activate_packs) deals the first round. Every
/// transition either applies completely or leaves the state untouched.
pub struct RoundState {
    rng: StdRng,
    hand_size: usize,
    active_packs: BTreeSet<PackId>,
    active_prompts: Vec<PromptCard>,
    active_responses: Vec<ResponseCard>,
    hand: Vec<ResponseCard>,
    current_prompt: Option<PromptCard>,
    selected: VecSet<ResponseCard>,
    rounds_completed: u32,
    is_saved: bool,
}

impl RoundState {
    pub fn new(hand_size: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), hand_size)
    }

    /// A state whose draws are reproducible
    pub fn with_seed(seed: u64, hand_size: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), hand_size)
    }

    fn with_rng(rng: StdRng, hand_size: usize) -> Self {
        RoundState {
            rng,
            hand_size: hand_size.max(1),
            active_packs: BTreeSet::new(),
            active_prompts: Vec::new(),
            active_responses: Vec::new(),
            hand: Vec::new(),
            current_prompt: None,
            selected: VecSet::new(),
            rounds_completed: 0,
            is_saved: false,
        }
    }

    pub fn active_packs(&self) -> &BTreeSet<PackId> {
        &self.active_packs
    }

    pub fn active_prompts(&self) -> &[PromptCard] {
        &self.active_prompts
    }

    pub fn active_responses(&self) -> &[ResponseCard] {
        &self.active_responses
    }

    pub fn hand(&self) -> &[ResponseCard] {
        &self.hand
    }

    pub fn current_prompt(&self) -> Option<&PromptCard> {
        self.current_prompt.as_ref()
    }

    pub fn selected(&self) -> &VecSet<ResponseCard> {
        &self.selected
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    pub fn is_initialized(&self) -> bool {
        self.current_prompt.is_some()
    }

    /// How many responses the current prompt wants, 0 before the first deal
    pub fn pick(&self) -> usize {
        self.current_prompt
            .as_ref()
            .map_or(0, |prompt| prompt.pick as usize)
    }

    pub fn can_advance(&self) -> bool {
        self.is_initialized() && self.selected.len() == self.pick()
    }

    /// The current prompt paired with the current selection
    pub fn current_play(&self) -> Option<SavedPlay> {
        let prompt = self.current_prompt.clone()?;
        Some(SavedPlay::new(prompt, self.selected.clone()))
    }

    pub fn rendered_prompt(&self, options: RenderOptions) -> Rendered {
        match &self.current_prompt {
            Some(prompt) => render(prompt, &self.selected, options),
            None => Rendered::default(),
        }
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn set_saved(&mut self, saved: bool) {
        self.is_saved = saved;
    }

    /// Puts the cards of the given packs in play and deals a fresh round. Unknown ids are skipped.
    /// If the packs don't add up to at least one prompt and one response the first pack of the
    /// catalog is used instead.
    pub fn activate_packs(&mut self, catalog: &Catalog, pack_ids: &BTreeSet<PackId>) -> Result<()> {
        let (mut packs, mut prompts, mut responses) = collect_pools(catalog, pack_ids);

        if prompts.is_empty() || responses.is_empty() {
            let fallback = catalog.first();
            if !fallback.is_playable() {
                return Err(GameError::MalformedCatalog(format!(
                    "default pack {:?} has no cards to play with",
                    fallback.name
                )));
            }

            warn!(
                "Packs {:?} have nothing to play with, falling back to {}",
                pack_ids, fallback.name
            );
            packs = std::iter::once(fallback.id).collect();
            prompts = fallback.prompts.clone();
            responses = fallback.responses.clone();
        }

        self.active_packs = packs;
        self.active_prompts = prompts;
        self.active_responses = responses;
        self.hand = self.draw_hand();
        self.current_prompt = self.active_prompts.choose(&mut self.rng).cloned();
        self.selected.clear();
        self.rounds_completed = 0;
        self.is_saved = false;

        info!(
            "Activated {} packs: {} prompts, {} responses",
            self.active_packs.len(),
            self.active_prompts.len(),
            self.active_responses.len()
        );
        Ok(())
    }

    /// Adds `card` to the selection. Once the prompt is filled the next pick starts over.
    /// Returns whether anything changed.
    pub fn select(&mut self, card: &ResponseCard) -> bool {
        let pick = self.pick();
        if pick == 0 || self.selected.contains(card) {
            return false;
        }

        if !self.hand.contains(card) {
            debug!("Ignoring selection of {:?}, it's not in the hand", card.text);
            return false;
        }

        if self.selected.len() >= pick {
            self.selected.clear();
        }

        self.selected.insert(card.clone());
        self.is_saved = false;
        true
    }

    pub fn unselect(&mut self, card: &ResponseCard) -> bool {
        if self.selected.remove(card).is_none() {
            return false;
        }

        // The pairing that was saved no longer exists
        self.is_saved = false;
        true
    }

    /// Deals a whole new hand. Selected cards stay selected even if they leave the hand.
    pub fn reshuffle_hand(&mut self) {
        self.hand = self.draw_hand();
    }

    /// Moves on to the next prompt. Only allowed once the current prompt has all of its responses.
    pub fn advance_round(&mut self) -> Result<()> {
        if !self.can_advance() {
            return Err(GameError::NotReady {
                selected: self.selected.len(),
                pick: self.pick(),
            });
        }

        let next_prompt = {
            let current = &self.current_prompt;
            let candidates = self
                .active_prompts
                .iter()
                .filter(|prompt| Some(*prompt) != current.as_ref())
                .collect::<Vec<_>>();
            match candidates.choose(&mut self.rng) {
                Some(prompt) => (*prompt).clone(),
                None => {
                    debug!("Only one prompt in play, repeating it");
                    match self.current_prompt.clone() {
                        Some(prompt) => prompt,
                        None => return Err(GameError::NotReady { selected: 0, pick: 0 }),
                    }
                }
            }
        };

        let selected = &self.selected;
        let played = self.hand.iter().filter(|card| selected.contains(*card)).count();
        let replacements = {
            let in_hand = self.hand.iter().collect::<HashSet<_>>();
            let fresh = self
                .active_responses
                .iter()
                .filter(|card| !in_hand.contains(card))
                .collect::<Vec<_>>();

            if fresh.len() >= played {
                fresh
                    .choose_multiple(&mut self.rng, played)
                    .map(|card| (*card).clone())
                    .collect::<Vec<_>>()
            } else {
                // Not enough unseen cards, so played cards go back into the draw
                debug!(
                    "{}, reusing played cards",
                    GameError::PoolExhausted {
                        needed: played,
                        available: fresh.len(),
                    }
                );
                let discarded = self
                    .hand
                    .iter()
                    .filter(|card| selected.contains(*card))
                    .collect::<Vec<_>>();
                let mut drawn = fresh.iter().map(|card| (*card).clone()).collect::<Vec<_>>();
                drawn.extend(
                    discarded
                        .choose_multiple(&mut self.rng, played - fresh.len())
                        .map(|card| (*card).clone()),
                );
                drawn
            }
        };

        self.hand.retain(|card| !selected.contains(card));
        self.hand.extend(replacements);
        self.current_prompt = Some(next_prompt);
        self.selected.clear();
        self.rounds_completed += 1;
        self.is_saved = false;

        debug!("Round {} complete", self.rounds_completed);
        Ok(())
    }

    fn draw_hand(&mut self) -> Vec<ResponseCard> {
        let count = self.hand_size.min(self.active_responses.len());
        self.active_responses
            .choose_multiple(&mut self.rng, count)
            .cloned()
            .collect()
    }
}

fn collect_pools(
    catalog: &Catalog,
    pack_ids: &BTreeSet<PackId>,
) -> (BTreeSet<PackId>, Vec<PromptCard>, Vec<ResponseCard>) {
    let packs = pack_ids
        .iter()
        .filter_map(|&id| {
            let pack = catalog.get(id);
            if pack.is_none() {
                warn!("Skipping unknown pack {}", id);
            }
            pack
        })
        .collect::<Vec<_>>();

    (
        packs.iter().map(|pack| pack.id).collect(),
        dedup(packs.iter().flat_map(|pack| pack.prompts.iter().cloned())),
        dedup(packs.iter().flat_map(|pack| pack.responses.iter().cloned())),
    )
}
