use common::data::cards::{is_english_pack, Pack, PackId, PackPreview, PromptCard, ResponseCard};
use serde::Deserialize;
use std::{collections::HashSet, hash::Hash};

use crate::error::{GameError, Result};

/// Parses a catalog document into packs. A pack's id is its position in the document. Cards keep
/// the `pack` they carry in the document, or get the id of the pack they're listed under if they
/// have none.
pub fn load_catalog(document: &[u8]) -> Result<Vec<Pack>> {
    let raw_packs = serde_json::from_slice::<Vec<RawPack>>(document)
        .map_err(|e| GameError::MalformedCatalog(e.to_string()))?;

    if raw_packs.is_empty() {
        return Err(GameError::MalformedCatalog(
            "catalog contains no packs".to_owned(),
        ));
    }

    Ok(raw_packs
        .into_iter()
        .enumerate()
        .map(|(id, raw)| raw.into_pack(id))
        .collect())
}

/// Same parse as [load_catalog], keeping only what's needed to list the packs
pub fn load_previews(document: &[u8]) -> Result<Vec<PackPreview>> {
    Ok(load_catalog(document)?.iter().map(Pack::preview).collect())
}

/// The parsed catalog. Read-only once built, so it's shared between sessions behind an `Arc`.
#[derive(Debug)]
pub struct Catalog {
    packs: Vec<Pack>,
}

impl Catalog {
    pub fn new(packs: Vec<Pack>) -> Result<Self> {
        if packs.is_empty() {
            return Err(GameError::MalformedCatalog(
                "catalog contains no packs".to_owned(),
            ));
        }

        Ok(Catalog { packs })
    }

    pub fn from_document(document: &[u8]) -> Result<Self> {
        Self::new(load_catalog(document)?)
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn get(&self, id: PackId) -> Option<&Pack> {
        self.packs.get(id)
    }

    /// The default pack
    pub fn first(&self) -> &Pack {
        // Never empty, checked on construction
        &self.packs[0]
    }

    pub fn previews(&self) -> Vec<PackPreview> {
        self.packs.iter().map(Pack::preview).collect()
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

// Every field is optional in the wild, and unknown fields are ignored
#[derive(Deserialize)]
struct RawPack {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    official: Option<bool>,
    #[serde(default)]
    white: Option<Vec<RawResponse>>,
    #[serde(default)]
    black: Option<Vec<RawPrompt>>,
}

#[derive(Deserialize)]
struct RawResponse {
    text: String,
    #[serde(default)]
    pack: Option<PackId>,
}

#[derive(Deserialize)]
struct RawPrompt {
    text: String,
    #[serde(default)]
    pick: u32,
    #[serde(default)]
    pack: Option<PackId>,
}

impl RawPack {
    fn into_pack(self, id: PackId) -> Pack {
        let name = self.name.unwrap_or_default();

        Pack {
            id,
            is_english: is_english_pack(&name),
            name,
            official: self.official.unwrap_or(false),
            responses: dedup(
                self.white
                    .unwrap_or_default()
                    .into_iter()
                    .map(|raw| ResponseCard::new(raw.text, raw.pack.unwrap_or(id))),
            ),
            prompts: dedup(
                self.black
                    .unwrap_or_default()
                    .into_iter()
                    .map(|raw| {
                        PromptCard::new(raw.text, raw.pick.max(1), raw.pack.unwrap_or(id))
                    }),
            ),
        }
    }
}

pub(crate) fn dedup<T, I>(cards: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|card| seen.insert(card.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"[
        {
            "name": "CAH Base Set",
            "official": true,
            "white": [
                {"text": "A bag of magic beans.", "pack": 0},
                {"text": "Flying robots.", "pack": 0},
                {"text": "A bag of magic beans.", "pack": 0}
            ],
            "black": [
                {"text": "Why can't I sleep at night?", "pick": 1, "pack": 0},
                {"text": "_ + _ = _.", "pick": 3, "pack": 0}
            ],
            "icon": "cards"
        },
        {"name": "Czech", "official": false, "white": [{"text": "Knedlík.", "pack": 1}]},
        {"name": "Nothing Yet", "white": null}
    ]"#;

    #[test]
    fn parses_packs() {
        let packs = load_catalog(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(packs.len(), 3);

        let base = &packs[0];
        assert_eq!(base.id, 0);
        assert!(base.official);
        assert!(base.is_english);
        assert_eq!(base.responses.len(), 2, "duplicate cards collapse");
        assert_eq!(base.prompts[1].pick, 3);

        let czech = &packs[1];
        assert!(!czech.is_english);
        assert!(czech.prompts.is_empty());
        assert_eq!(czech.responses[0].pack, 1);

        let empty = &packs[2];
        assert!(!empty.official);
        assert!(!empty.is_playable());
    }

    #[test]
    fn previews_count_cards() {
        let previews = load_previews(DOCUMENT.as_bytes()).unwrap();
        assert_eq!(previews[0].response_count, 2);
        assert_eq!(previews[0].prompt_count, 2);
        assert_eq!(previews[0].card_count(), 4);
        assert_eq!(previews[1].name, "Czech");
    }

    #[test]
    fn missing_pick_means_one() {
        let packs = load_catalog(br#"[{"name": "x", "black": [{"text": "_."}]}]"#).unwrap();
        assert_eq!(packs[0].prompts[0].pick, 1);
    }

    #[test]
    fn cards_keep_their_own_pack() {
        let packs = load_catalog(
            br#"[{"name": "x", "white": [{"text": "Moss."}, {"text": "Rain.", "pack": 7}],
                 "black": [{"text": "_?", "pick": 1, "pack": 7}]}]"#,
        )
        .unwrap();
        assert_eq!(packs[0].id, 0);
        assert_eq!(packs[0].responses[0].pack, 0);
        assert_eq!(packs[0].responses[1].pack, 7);
        assert_eq!(packs[0].prompts[0].pack, 7);
    }

    #[test]
    fn unparsable_catalog_is_malformed() {
        assert!(matches!(
            load_catalog(b"{\"name\": "),
            Err(GameError::MalformedCatalog(_))
        ));
        assert!(matches!(
            load_catalog(b"[]"),
            Err(GameError::MalformedCatalog(_))
        ));
    }
}
