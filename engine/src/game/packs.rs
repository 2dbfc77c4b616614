use common::data::{
    cards::{PackId, PackInfo},
    selection::SelectionMode,
};
use log::debug;
use rand::{seq::SliceRandom, Rng};
use std::{collections::BTreeSet, convert::TryFrom};

/// Works out which packs a selection mode activates. The result is never empty for a non-empty
/// catalog: anything that would select nothing falls back to the first pack.
///
/// Only [SelectionMode::Random] draws from `rng`.
pub fn resolve<P, R>(mode: &SelectionMode, catalog: &[P], rng: &mut R) -> BTreeSet<PackId>
where
    P: PackInfo,
    R: Rng + ?Sized,
{
    let resolved: BTreeSet<PackId> = match mode {
        SelectionMode::Default => BTreeSet::new(),
        SelectionMode::Official => catalog
            .iter()
            .filter(|pack| pack.official())
            .map(PackInfo::id)
            .collect(),
        SelectionMode::AllByLanguage => catalog
            .iter()
            .filter(|pack| pack.is_english())
            .map(PackInfo::id)
            .collect(),
        SelectionMode::ByLanguage(language) => catalog
            .iter()
            .filter(|pack| pack.name() == language.name())
            .map(PackInfo::id)
            .collect(),
        SelectionMode::Random(amount) => {
            let english = catalog
                .iter()
                .filter(|pack| pack.is_english())
                .collect::<Vec<_>>();
            let amount = usize::try_from(*amount).unwrap_or(0).min(english.len());
            english
                .choose_multiple(rng, amount)
                .map(|pack| pack.id())
                .collect()
        }
        SelectionMode::Custom(indices) => indices
            .iter()
            .filter_map(|&index| catalog.get(index))
            .map(PackInfo::id)
            .collect(),
    };

    if resolved.is_empty() {
        debug!("{:?} selects no packs, using the default pack", mode);
        return default_packs(catalog);
    }

    resolved
}

fn default_packs<P: PackInfo>(catalog: &[P]) -> BTreeSet<PackId> {
    catalog.first().map(PackInfo::id).into_iter().collect()
}
