use common::{
    data::{cards::Language, selection::SelectionMode},
    documents::{decode, SavedPlay},
    PackSelectionMode,
};
use engine::{
    data::{Catalog, PackStore},
    store::{DocumentStore, MemoryStore, SAVED_PLAYS_KEY},
    EngineConfig,
    GameError,
    Session,
};
use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("cards.json")
}

async fn catalog() -> Arc<Catalog> {
    PackStore::new(fixture()).load().await.unwrap()
}

fn ids(ids: &[usize]) -> BTreeSet<usize> {
    ids.iter().copied().collect()
}

/// Selects as many cards from the hand as the prompt wants
fn fill_prompt(session: &mut Session) {
    let cards = session.round().hand()[.. session.round().pick()].to_vec();
    for card in &cards {
        assert!(session.select(card));
    }
    assert!(session.round().can_advance());
}

#[tokio::test]
async fn plays_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        data_dir: dir.path().join("data"),
        catalog_path: fixture(),
        ..EngineConfig::default()
    };

    let mut session = Session::open(&config).await.unwrap();
    assert!(session.saved_plays().is_empty());
    assert!(dir.path().join("data").join("jokes.json").exists());

    fill_prompt(&mut session);
    session.save().unwrap();
    let play = session.round().current_play().unwrap();
    session.flush().await.unwrap();

    let json = std::fs::read(dir.path().join("data").join("jokes.json")).unwrap();
    let stored: Vec<SavedPlay> = decode(&json).unwrap();
    assert_eq!(stored, vec![play.clone()]);
    assert!(String::from_utf8(json).unwrap().contains("blackCard"));

    drop(session);
    let reopened = Session::open(&config).await.unwrap();
    assert_eq!(reopened.saved_plays(), &[play][..]);
}

#[tokio::test]
async fn selection_modes() {
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::start_seeded(catalog().await, store, &EngineConfig::default(), 3)
        .await
        .unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[0]));

    session.change_selection(SelectionMode::Official).await.unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[0, 1]));

    session
        .change_selection(SelectionMode::ByLanguage(Language::Italian))
        .await
        .unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[3]));
    assert_eq!(session.round().hand().len(), 1);

    session
        .change_selection(SelectionMode::ByLanguage(Language::Catalan))
        .await
        .unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[0]));

    // A pack without cards can't carry a round on its own
    session
        .change_selection(SelectionMode::Custom(ids(&[4])))
        .await
        .unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[0]));

    session.change_selection(SelectionMode::Random(2)).await.unwrap();
    let active = session.round().active_packs();
    assert!(!active.is_empty() && active.len() <= 2);
    assert!(active.is_subset(&ids(&[0, 1, 2, 4])));
    assert_eq!(session.preferences().random_amount, 2);
}

#[tokio::test]
async fn advancing_needs_a_full_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::start_seeded(catalog().await, store, &EngineConfig::default(), 8)
        .await
        .unwrap();
    let before = session.snapshot();

    assert!(matches!(
        session.advance_round(),
        Err(GameError::NotReady { selected: 0, .. })
    ));
    assert_eq!(session.snapshot().hand, before.hand);
    assert_eq!(session.snapshot().current_prompt, before.current_prompt);

    fill_prompt(&mut session);
    session.advance_round().unwrap();

    let after = session.snapshot();
    assert_eq!(after.rounds_completed, 1);
    assert!(after.selected.is_empty());
    assert!(!after.is_saved);
    assert_ne!(after.current_prompt, before.current_prompt);
}

#[tokio::test]
async fn snapshots_render_the_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut session = Session::start_seeded(catalog().await, store, &EngineConfig::default(), 21)
        .await
        .unwrap();
    let mut snapshots = session.subscribe();

    let prompt = session.round().current_prompt().unwrap().clone();
    assert_eq!(snapshots.borrow().rendered_prompt.to_plain(), prompt.text);

    let card = session.round().hand()[0].clone();
    session.select(&card);
    assert!(snapshots.has_changed().unwrap());

    let rendered = snapshots.borrow_and_update().rendered_prompt.to_plain();
    assert!(rendered.contains(card.text.trim_end_matches('.')));
}

#[tokio::test]
async fn unsaving_removes_the_stored_play() {
    let store = Arc::new(MemoryStore::new());
    let mut session =
        Session::start_seeded(catalog().await, store.clone(), &EngineConfig::default(), 4)
            .await
            .unwrap();

    fill_prompt(&mut session);
    session.save().unwrap();
    session.unsave();
    session.flush().await.unwrap();

    let bytes = store.read(SAVED_PLAYS_KEY).await.unwrap().unwrap();
    let stored: Vec<SavedPlay> = decode(&bytes).unwrap();
    assert!(stored.is_empty());
    assert!(!session.snapshot().is_saved);
}

#[tokio::test]
async fn failed_writes_surface_on_flush() {
    let store = Arc::new(MemoryStore::new());
    let mut session =
        Session::start_seeded(catalog().await, store.clone(), &EngineConfig::default(), 4)
            .await
            .unwrap();

    store.set_fail_writes(true);
    fill_prompt(&mut session);
    session.save().unwrap();

    // The flag flips right away and stays flipped
    assert!(session.snapshot().is_saved);
    assert!(matches!(
        session.flush().await,
        Err(GameError::StoreWriteFailed { .. })
    ));
    assert!(session.round().is_saved());
    assert_eq!(session.saved_plays().len(), 1);
}

#[tokio::test]
async fn stored_preferences_pick_the_packs() {
    let store = Arc::new(MemoryStore::new());
    store
        .write(
            "store",
            br#"{"packSelectionMode":"CUSTOM","selectedPackIndices":[1,2]}"#.to_vec(),
        )
        .await
        .unwrap();
    store
        .write("flags", br#"{"Italian":true}"#.to_vec())
        .await
        .unwrap();

    let session = Session::start(catalog().await, store, &EngineConfig::default())
        .await
        .unwrap();
    assert_eq!(session.round().active_packs(), &ids(&[1, 2]));
    assert_eq!(session.preferences().random_amount, 5);
    assert!(session
        .available_modes()
        .contains(&PackSelectionMode::Italian));
    assert!(!session
        .available_modes()
        .contains(&PackSelectionMode::Czech));
}

#[tokio::test]
async fn missing_catalog_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        data_dir: dir.path().to_owned(),
        catalog_path: dir.path().join("nope.json"),
        ..EngineConfig::default()
    };

    assert!(matches!(
        Session::open(&config).await,
        Err(GameError::MalformedCatalog(_))
    ));
}
