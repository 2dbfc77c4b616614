use common::documents::SavedPlay;

use crate::{error::Result, proto};

proto!(
    SavedPlayMessage,
    with_response: {
        LoadPlays: Result<Vec<SavedPlay>>,
        Flush: Result<()>
    },
    without_response: [AddPlay, RemovePlay]
);

pub struct LoadPlays;

/// Waits for every earlier write, returning the first failure since the last flush
pub struct Flush;

pub struct AddPlay {
    pub play: SavedPlay,
}

pub struct RemovePlay {
    pub play: SavedPlay,
}
